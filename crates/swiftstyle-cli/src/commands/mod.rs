//! CLI subcommand implementations.

pub mod fix;
pub mod init;
pub mod lint;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use std::path::Path;
use swiftstyle_core::{Analyzer, Config, RuleBox, Severity};
use swiftstyle_rules::{configured_rules, Preset};

use crate::config_resolver::{self, ConfigSource};

/// Loads the resolved configuration. A malformed file is fatal.
pub fn load_config(path: &Path, explicit: Option<&Path>) -> Result<Config> {
    let resolved =
        config_resolver::load(path, explicit).context("Failed to load configuration")?;
    match &resolved.source {
        ConfigSource::Global(p) => tracing::info!("Using global config: {}", p.display()),
        other => {
            if let Some(p) = other.path() {
                tracing::debug!("Using config: {}", p.display());
            }
        }
    }
    Ok(resolved.config)
}

/// Builds the analyzer shared by `lint` and `fix`.
pub fn build_analyzer(
    path: &Path,
    config: Config,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
) -> Result<Analyzer> {
    let preset = match config.preset.as_deref() {
        Some(name) => name
            .parse::<Preset>()
            .map_err(|e| anyhow::anyhow!("{e}"))?,
        None => Preset::Recommended,
    };

    let rules = match rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names, &config)
        }
        None => configured_rules(preset, &config),
    };

    let mut builder = Analyzer::builder().root(path).config(config);
    for pattern in exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    builder.build().context("Failed to build analyzer")
}

/// Severity threshold for exit code 1: CLI flag beats config.
pub fn fail_on_severity(config: &Config, flag: Option<&str>) -> Result<Severity> {
    match flag {
        Some(s) => s
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid --fail-on value `{s}`")),
        None => Ok(config.fail_on_severity()),
    }
}

/// Selects rules by name or code from the full rule set.
fn filter_rules(names: &[&str], config: &Config) -> Vec<RuleBox> {
    let all = configured_rules(Preset::All, config);
    for name in names {
        if !all
            .iter()
            .any(|r| r.name() == *name || r.code().eq_ignore_ascii_case(name))
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }
    all.into_iter()
        .filter(|r| {
            names
                .iter()
                .any(|n| r.name() == *n || r.code().eq_ignore_ascii_case(n))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_by_name_and_code() {
        let config = Config::default();
        let rules = filter_rules(&["type-casing", "SW007"], &config);
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["type-casing", "no-force-unwrap"]);
    }

    #[test]
    fn unknown_rule_filters_to_nothing() {
        let config = Config::default();
        assert!(filter_rules(&["no-such-rule"], &config).is_empty());
    }

    #[test]
    fn fail_on_flag_beats_config() {
        let config = Config::parse("fail_on = \"error\"").expect("parse failed");
        assert_eq!(
            fail_on_severity(&config, Some("warning")).expect("parse failed"),
            Severity::Warning
        );
        assert_eq!(
            fail_on_severity(&config, None).expect("parse failed"),
            Severity::Error
        );
        assert!(fail_on_severity(&config, Some("bogus")).is_err());
    }
}
