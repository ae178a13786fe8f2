//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# swiftstyle configuration
# See https://github.com/swiftstyle/swiftstyle for documentation

# Rule preset: "minimal", "recommended", "strict", or "all"
preset = "recommended"

# Lowest severity that fails the run: "info", "warning", or "error"
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./Sources"

# Glob patterns to exclude from analysis
exclude = [
    "**/.build/**",
    "**/DerivedData/**",
    "**/Pods/**",
]

[style]
# Acronyms rendered as a unit in identifiers
acronyms = ["URL", "HTTP", "HTTPS", "JSON", "XML", "API", "UUID", "ID", "HTML"]

# Maximum line length in columns
column_limit = 100

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-force-unwrap]
enabled = true
# severity = "warning"  # Override default severity
allow_in_tests = true
allow_attributes = ["IBOutlet"]
allow_in_fatal_error_paths = true
# allow_path_globs = ["**/Generated/**"]

# [rules.column-limit]
# limit = 120

# [rules.doc-public-api]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("swiftstyle.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created swiftstyle.toml");
    println!("\nNext steps:");
    println!("  1. Edit swiftstyle.toml to configure rules");
    println!("  2. Run: swiftstyle lint");

    Ok(())
}

#[cfg(test)]
mod tests {
    use swiftstyle_core::Config;

    #[test]
    fn default_config_template_parses() {
        let config = Config::parse(super::DEFAULT_CONFIG).expect("template must parse");
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.is_rule_enabled("no-force-unwrap"));
    }
}
