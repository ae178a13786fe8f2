//! Rule presets for common configurations.

use crate::{
    column_limit, no_force_unwrap, type_casing, AcronymCasing, ColumnLimit, DocPublicApi,
    ExplicitAccessLevel, GroupOverloads, ImportOrdering, NoForceUnwrap, OnePrimaryType,
    StatementPerLine, TypeCasing,
};
use std::str::FromStr;
use swiftstyle_core::{Config, RuleBox};

/// Preset configurations for swiftstyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Minimal rules for gradual adoption.
    Minimal,
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Strict rules for maximum consistency.
    Strict,
    /// Every available rule with default settings.
    All,
}

impl Preset {
    /// Returns the rules for this preset with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        configured_rules(self, &Config::default())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Self::Minimal),
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown preset `{other}` (expected minimal, recommended, strict, or all)"
            )),
        }
    }
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `type-casing` (SW001)
/// - `no-force-unwrap` (SW007)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns the recommended set of rules: everything except the
/// organizational `group-overloads` and `doc-public-api` checks.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the strict set of rules.
///
/// All rules, with `no-force-unwrap` also enforced in test files.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    Preset::All.rules()
}

/// Builds the rules for `preset` with options taken from `config`.
///
/// Enable/disable flags and severity overrides are the analyzer's job;
/// this only wires rule-specific options (acronym list, column limit,
/// force-unwrap allowances) into the constructed rules.
#[must_use]
pub fn configured_rules(preset: Preset, config: &Config) -> Vec<RuleBox> {
    let mut rules: Vec<RuleBox> = vec![
        Box::new(build_type_casing(config)),
        Box::new(build_no_force_unwrap(config, preset == Preset::Strict)),
    ];

    if preset != Preset::Minimal {
        rules.push(Box::new(build_acronym_casing(config)));
        rules.push(Box::new(ImportOrdering::new()));
        rules.push(Box::new(OnePrimaryType::new()));
        rules.push(Box::new(build_column_limit(config)));
        rules.push(Box::new(StatementPerLine::new()));
        rules.push(Box::new(ExplicitAccessLevel::new()));
    }

    if matches!(preset, Preset::Strict | Preset::All) {
        rules.push(Box::new(GroupOverloads::new()));
        rules.push(Box::new(DocPublicApi::new()));
    }

    rules
}

fn build_type_casing(config: &Config) -> TypeCasing {
    let mut rule = TypeCasing::new().acronyms(config.style.acronyms.clone());
    if let Some(rc) = config.rule_config(type_casing::NAME) {
        rule = rule.check_parameters(rc.get_bool("check_parameters", true));
    }
    rule
}

fn build_acronym_casing(config: &Config) -> AcronymCasing {
    AcronymCasing::new().acronyms(config.style.acronyms.clone())
}

fn build_column_limit(config: &Config) -> ColumnLimit {
    let mut limit = config.style.column_limit;
    if let Some(rc) = config.rule_config(column_limit::NAME) {
        limit = usize::try_from(rc.get_int("limit", limit as i64)).unwrap_or(limit);
    }
    ColumnLimit::new().limit(limit)
}

fn build_no_force_unwrap(config: &Config, strict: bool) -> NoForceUnwrap {
    let mut rule = NoForceUnwrap::new().allow_in_tests(!strict);
    if let Some(rc) = config.rule_config(no_force_unwrap::NAME) {
        let default_allow_in_tests = rule.allow_in_tests;
        let default_allow_in_fatal_error_paths = rule.allow_in_fatal_error_paths;
        rule = rule
            .allow_in_tests(rc.get_bool("allow_in_tests", default_allow_in_tests))
            .allow_in_fatal_error_paths(
                rc.get_bool("allow_in_fatal_error_paths", default_allow_in_fatal_error_paths),
            );
        if let Some(globs) = rc.get_str_array("allow_path_globs") {
            rule = rule.allow_path_globs(globs);
        }
        if let Some(attrs) = rc.get_str_array("allow_attributes") {
            rule = rule.allow_attributes(attrs);
        }
    }
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement_per_line;

    #[test]
    fn preset_rule_counts() {
        assert_eq!(minimal_rules().len(), 2);
        assert_eq!(recommended_rules().len(), 8);
        assert_eq!(strict_rules().len(), 10);
        assert_eq!(all_rules().len(), 10);
    }

    #[test]
    fn preset_parsing() {
        assert_eq!("recommended".parse::<Preset>(), Ok(Preset::Recommended));
        assert_eq!("strict".parse::<Preset>(), Ok(Preset::Strict));
        assert!("fancy".parse::<Preset>().is_err());
    }

    #[test]
    fn rule_codes_are_unique() {
        let rules = all_rules();
        let mut codes: Vec<_> = rules.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), rules.len());
    }

    #[test]
    fn config_options_flow_into_rules() {
        let config = Config::parse(
            r#"
[style]
column_limit = 120

[rules.column-limit]
limit = 80

[rules.no-force-unwrap]
allow_in_tests = false
"#,
        )
        .expect("parse failed");

        let rules = configured_rules(Preset::Recommended, &config);
        assert!(rules
            .iter()
            .any(|r| r.name() == statement_per_line::NAME));
        // The per-rule limit wins over the shared style value.
        assert_eq!(build_column_limit(&config).limit, 80);
        assert!(!build_no_force_unwrap(&config, false).allow_in_tests);
    }
}
