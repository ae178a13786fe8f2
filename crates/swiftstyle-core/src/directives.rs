//! Comment-based suppression directives.
//!
//! Supports directives like:
//! ```text
//! // swiftstyle:disable no-force-unwrap reason="validated at startup"
//! ```
//! on the violating line or the line immediately above it.

use std::collections::HashSet;

/// Result of checking for a disable directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisableCheck {
    /// No matching directive; the violation stands.
    Active,
    /// A directive suppresses the rule, with optional reason.
    Disabled {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl DisableCheck {
    /// Returns true if the rule is suppressed at this location.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled { .. })
    }

    /// Returns the reason if suppressed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Disabled { reason } => reason.as_deref(),
            Self::Active => None,
        }
    }
}

/// Parsed disable directive.
#[derive(Debug, Clone)]
struct DisableDirective {
    rules: HashSet<String>,
    reason: Option<String>,
}

/// Checks source for a disable directive covering `rule_name` at `line`.
///
/// The directive may appear on the flagged line itself or the line above.
#[must_use]
pub fn check_disable(content: &str, line: usize, rule_name: &str) -> DisableCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return DisableCheck::Disabled {
                    reason: directive.reason,
                };
            }
        }
    }

    DisableCheck::Active
}

/// Parses `// swiftstyle:disable rule1 rule2 reason="..."` from one line.
fn parse_directive(line: &str) -> Option<DisableDirective> {
    let comment_start = line.find("//")?;
    let comment = line[comment_start + 2..].trim_start();
    let rest = comment.strip_prefix("swiftstyle:disable")?;

    let (rule_part, reason) = match rest.find("reason=") {
        Some(idx) => {
            let reason_raw = rest[idx + "reason=".len()..].trim();
            let reason = reason_raw
                .strip_prefix('"')
                .and_then(|r| r.split('"').next())
                .map(ToString::to_string)
                .filter(|r| !r.is_empty());
            (&rest[..idx], reason)
        }
        None => (rest, None),
    };

    let rules: HashSet<String> = rule_part
        .split([' ', ',', '\t'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if rules.is_empty() {
        return None;
    }

    Some(DisableDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_on_same_line() {
        let src = "let id = user!.id // swiftstyle:disable no-force-unwrap reason=\"seeded\"\n";
        let check = check_disable(src, 1, "no-force-unwrap");
        assert!(check.is_disabled());
        assert_eq!(check.reason(), Some("seeded"));
    }

    #[test]
    fn directive_on_line_above() {
        let src = "// swiftstyle:disable type-casing\nclass lowercased {}\n";
        assert!(check_disable(src, 2, "type-casing").is_disabled());
    }

    #[test]
    fn directive_without_reason() {
        let src = "// swiftstyle:disable column-limit\nlet x = 1\n";
        let check = check_disable(src, 2, "column-limit");
        assert!(check.is_disabled());
        assert_eq!(check.reason(), None);
    }

    #[test]
    fn disable_all() {
        let src = "// swiftstyle:disable all\nlet x = 1\n";
        assert!(check_disable(src, 2, "anything").is_disabled());
    }

    #[test]
    fn other_rule_not_suppressed() {
        let src = "// swiftstyle:disable column-limit\nclass lowercased {}\n";
        assert_eq!(check_disable(src, 2, "type-casing"), DisableCheck::Active);
    }

    #[test]
    fn multiple_rules_in_one_directive() {
        let src = "// swiftstyle:disable type-casing, acronym-casing\nclass urlParser {}\n";
        assert!(check_disable(src, 2, "type-casing").is_disabled());
        assert!(check_disable(src, 2, "acronym-casing").is_disabled());
    }

    #[test]
    fn ordinary_comment_is_not_a_directive() {
        let src = "// disable everything please\nlet x = 1\n";
        assert_eq!(check_disable(src, 2, "type-casing"), DisableCheck::Active);
    }

    #[test]
    fn out_of_range_line_is_active() {
        assert_eq!(check_disable("let x = 1", 99, "r"), DisableCheck::Active);
    }
}
