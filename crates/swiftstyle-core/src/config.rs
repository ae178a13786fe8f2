//! Configuration types for swiftstyle.
//!
//! Rule parameters (acronym list, column limit, allowlist patterns) are
//! collaborator input consumed at startup; the engine never hard-codes
//! them. Malformed configuration is fatal before any file is processed.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for swiftstyle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing exit code (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Shared style parameters read by several rules.
    #[serde(default)]
    pub style: StyleConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration table for a rule, if present.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Severity threshold that causes a failing exit code.
    #[must_use]
    pub fn fail_on_severity(&self) -> Severity {
        self.fail_on
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Severity::Error)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Glob patterns to include (if empty, all *.swift files).
    #[serde(default)]
    pub include: Vec<String>,

    /// Maximum number of parallel file analyses (default: all cores).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec![
                "**/.build/**".to_string(),
                "**/DerivedData/**".to_string(),
                "**/Pods/**".to_string(),
            ],
            include: Vec::new(),
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Style parameters shared across rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Acronyms rendered as a unit in identifiers (case-insensitive match).
    #[serde(default = "default_acronyms")]
    pub acronyms: Vec<String>,

    /// Maximum line length in columns.
    #[serde(default = "default_column_limit")]
    pub column_limit: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            acronyms: default_acronyms(),
            column_limit: default_column_limit(),
        }
    }
}

fn default_acronyms() -> Vec<String> {
    ["URL", "HTTP", "HTTPS", "JSON", "XML", "API", "UUID", "ID", "HTML"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_column_limit() -> usize {
    100
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Option<Vec<String>> {
        self.options.get(key).and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
    }
}

/// Configuration errors. Fatal at startup, before any file is processed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.rules.is_empty());
        assert_eq!(config.style.column_limit, 100);
        assert!(config.style.acronyms.iter().any(|a| a == "URL"));
        assert_eq!(config.fail_on_severity(), Severity::Error);
    }

    #[test]
    fn parse_config() {
        let toml = r#"
fail_on = "warning"

[analyzer]
root = "./Sources"
exclude = ["**/Generated/**"]

[style]
column_limit = 120
acronyms = ["URL", "SQL"]

[rules.no-force-unwrap]
enabled = true
severity = "warning"
allow_path_globs = ["**/Tests/**"]

[rules.column-limit]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./Sources"));
        assert_eq!(config.style.column_limit, 120);
        assert_eq!(config.fail_on_severity(), Severity::Warning);
        assert!(config.is_rule_enabled("no-force-unwrap"));
        assert!(!config.is_rule_enabled("column-limit"));
        assert_eq!(
            config.rule_severity("no-force-unwrap"),
            Some(Severity::Warning)
        );

        let rc = config.rules.get("no-force-unwrap").expect("missing rule");
        assert_eq!(
            rc.get_str_array("allow_path_globs"),
            Some(vec!["**/Tests/**".to_string()])
        );
    }

    #[test]
    fn from_file_reads_and_reports_io_errors() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let path = dir.path().join("swiftstyle.toml");
        std::fs::write(&path, "fail_on = \"info\"\n").expect("write failed");

        let config = Config::from_file(&path).expect("load failed");
        assert_eq!(config.fail_on_severity(), Severity::Info);

        let err = Config::from_file(&dir.path().join("missing.toml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::parse("analyzer = 5").is_err());
        assert!(Config::parse("[[rules").is_err());
    }

    #[test]
    fn unknown_rule_is_enabled_by_default() {
        let config = Config::default();
        assert!(config.is_rule_enabled("anything"));
    }
}
