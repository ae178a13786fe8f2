//! Batch fix application.
//!
//! Fixes are byte-range replacements computed against the original
//! buffer, applied in one descending-offset pass so earlier replacements
//! never shift later offsets. Overlapping fixes are rejected up front;
//! a file is rewritten completely or not at all.

use crate::types::{Replacement, Violation};
use thiserror::Error;

/// Fix application failure for one file. The original source is left
/// untouched in every error case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    /// Two selected fixes cover overlapping byte ranges.
    #[error("conflicting fixes: [{first}] and [{second}] overlap at byte {offset}")]
    ConflictingFixes {
        /// Rule code of the earlier fix.
        first: String,
        /// Rule code of the later fix.
        second: String,
        /// Byte offset where the overlap begins.
        offset: usize,
    },

    /// A replacement range falls outside the source buffer.
    #[error("fix for [{code}] has out-of-bounds range {offset}..{end}")]
    InvalidRange {
        /// Rule code of the offending fix.
        code: String,
        /// Start of the range.
        offset: usize,
        /// End of the range.
        end: usize,
    },

    /// Re-analysis after applying fixes reproduced a fixed violation.
    #[error("fix for [{code}] did not converge: the violation reappeared after rewriting")]
    DidNotConverge {
        /// Rule code whose fix failed to converge.
        code: String,
    },
}

/// One fix selected for application, retaining its provenance.
#[derive(Debug, Clone)]
pub struct PlannedFix {
    /// Rule code that produced the fix.
    pub code: String,
    /// The byte-range replacement.
    pub replacement: Replacement,
}

/// Collects the applicable fixes from a violation list.
///
/// Only violations carrying a mechanical replacement participate;
/// suggestion-only violations are reported but never applied.
#[must_use]
pub fn plan_fixes(violations: &[Violation]) -> Vec<PlannedFix> {
    violations
        .iter()
        .filter_map(|v| {
            let replacement = v.suggestion.as_ref()?.replacement.as_ref()?;
            Some(PlannedFix {
                code: v.code.clone(),
                replacement: replacement.clone(),
            })
        })
        .collect()
}

/// Applies a batch of fixes to the original buffer, producing a new one.
///
/// # Errors
///
/// Returns [`FixError::ConflictingFixes`] when two fixes overlap and
/// [`FixError::InvalidRange`] when a fix exceeds the buffer. Nothing is
/// partially applied.
pub fn apply_fixes(source: &str, fixes: &[PlannedFix]) -> Result<String, FixError> {
    let mut ordered: Vec<&PlannedFix> = fixes.iter().collect();
    ordered.sort_by_key(|f| (f.replacement.offset, f.replacement.length));
    ordered.dedup_by(|a, b| a.replacement == b.replacement && a.code == b.code);

    for fix in &ordered {
        let end = fix.replacement.offset + fix.replacement.length;
        if end > source.len()
            || !source.is_char_boundary(fix.replacement.offset)
            || !source.is_char_boundary(end)
        {
            return Err(FixError::InvalidRange {
                code: fix.code.clone(),
                offset: fix.replacement.offset,
                end,
            });
        }
    }

    for pair in ordered.windows(2) {
        let a = &pair[0].replacement;
        let b = &pair[1].replacement;
        if a.offset + a.length > b.offset {
            return Err(FixError::ConflictingFixes {
                first: pair[0].code.clone(),
                second: pair[1].code.clone(),
                offset: b.offset,
            });
        }
    }

    let mut output = source.to_string();
    for fix in ordered.iter().rev() {
        let r = &fix.replacement;
        output.replace_range(r.offset..r.offset + r.length, &r.new_text);
    }
    Ok(output)
}

/// Maps each applied fix's range into coordinates of the rewritten
/// buffer. Used by the convergence check: a fixed violation "reappears"
/// when a re-analysis violation with the same code intersects the mapped
/// range of its fix.
#[must_use]
pub fn mapped_ranges(fixes: &[PlannedFix]) -> Vec<(String, usize, usize)> {
    let mut ordered: Vec<&PlannedFix> = fixes.iter().collect();
    ordered.sort_by_key(|f| (f.replacement.offset, f.replacement.length));
    ordered.dedup_by(|a, b| a.replacement == b.replacement && a.code == b.code);

    let mut shift = 0_isize;
    let mut out = Vec::with_capacity(ordered.len());
    for fix in ordered {
        let r = &fix.replacement;
        let new_offset = usize::try_from(r.offset as isize + shift).unwrap_or(0);
        out.push((fix.code.clone(), new_offset, r.new_text.len()));
        shift += r.new_text.len() as isize - r.length as isize;
    }
    out
}

/// Checks re-analysis output against the applied fixes.
///
/// # Errors
///
/// Returns [`FixError::DidNotConverge`] naming the first rule whose
/// violation survived its own fix.
pub fn check_convergence(
    applied: &[PlannedFix],
    reanalyzed: &[Violation],
) -> Result<(), FixError> {
    for (code, offset, len) in mapped_ranges(applied) {
        let end = offset + len.max(1);
        let reappeared = reanalyzed.iter().any(|v| {
            v.code == code
                && v.location.offset < end
                && v.location.offset + v.location.length.max(1) > offset
        });
        if reappeared {
            return Err(FixError::DidNotConverge { code });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Location, Severity, Suggestion};
    use std::path::PathBuf;

    fn fix(code: &str, offset: usize, length: usize, new_text: &str) -> PlannedFix {
        PlannedFix {
            code: code.to_string(),
            replacement: Replacement::new(offset, length, new_text),
        }
    }

    #[test]
    fn applies_descending_without_offset_drift() {
        // "abc def ghi" -> replace "abc" and "ghi" in one batch.
        let out = apply_fixes(
            "abc def ghi",
            &[fix("A", 0, 3, "xyz"), fix("B", 8, 3, "long_tail")],
        )
        .expect("apply failed");
        assert_eq!(out, "xyz def long_tail");
    }

    #[test]
    fn rejects_overlapping_fixes() {
        let err = apply_fixes("hello world", &[fix("A", 0, 6, "x"), fix("B", 4, 3, "y")])
            .expect_err("should conflict");
        assert!(matches!(err, FixError::ConflictingFixes { .. }));
    }

    #[test]
    fn adjacent_fixes_do_not_conflict() {
        let out = apply_fixes("ab", &[fix("A", 0, 1, "x"), fix("B", 1, 1, "y")])
            .expect("apply failed");
        assert_eq!(out, "xy");
    }

    #[test]
    fn rejects_out_of_bounds() {
        let err = apply_fixes("ab", &[fix("A", 1, 5, "x")]).expect_err("should fail");
        assert!(matches!(err, FixError::InvalidRange { .. }));
    }

    #[test]
    fn rejects_range_splitting_a_multibyte_char() {
        // "é" spans bytes 4..6; a range ending at 5 lands mid-sequence.
        let source = "let é = 1";
        let err = apply_fixes(source, &[fix("A", 0, 5, "x")]).expect_err("should fail");
        assert_eq!(
            err,
            FixError::InvalidRange {
                code: "A".to_string(),
                offset: 0,
                end: 5,
            }
        );
        let err = apply_fixes(source, &[fix("A", 5, 1, "x")]).expect_err("should fail");
        assert!(matches!(err, FixError::InvalidRange { offset: 5, .. }));
    }

    #[test]
    fn empty_fix_list_is_identity() {
        assert_eq!(apply_fixes("abc", &[]).expect("apply failed"), "abc");
    }

    #[test]
    fn insertion_fix_with_zero_length() {
        let out =
            apply_fixes("class A {}", &[fix("SW008", 0, 0, "internal ")]).expect("apply failed");
        assert_eq!(out, "internal class A {}");
    }

    #[test]
    fn mapped_ranges_account_for_earlier_edits() {
        // First fix grows the buffer by 2 bytes; second range shifts.
        let ranges = mapped_ranges(&[fix("A", 0, 1, "abc"), fix("B", 5, 1, "z")]);
        assert_eq!(ranges[0], ("A".to_string(), 0, 3));
        assert_eq!(ranges[1], ("B".to_string(), 7, 1));
    }

    #[test]
    fn convergence_detects_reappearance() {
        let applied = vec![fix("SW001", 6, 3, "Foo")];
        let reappeared = vec![Violation::new(
            "SW001",
            "type-casing",
            Category::Naming,
            Severity::Warning,
            Location::new(PathBuf::from("a.swift"), 1, 7).with_span(6, 3),
            "still wrong",
        )];
        assert_eq!(
            check_convergence(&applied, &reappeared),
            Err(FixError::DidNotConverge {
                code: "SW001".to_string()
            })
        );
    }

    #[test]
    fn convergence_ignores_other_rules_and_ranges() {
        let applied = vec![fix("SW001", 6, 3, "Foo")];
        let others = vec![Violation::new(
            "SW008",
            "explicit-access-level",
            Category::Practices,
            Severity::Warning,
            Location::new(PathBuf::from("a.swift"), 1, 1).with_span(0, 5),
            "unrelated",
        )];
        assert!(check_convergence(&applied, &others).is_ok());
    }

    #[test]
    fn plan_fixes_skips_suggestion_only_violations() {
        let with_fix = Violation::new(
            "SW007",
            "no-force-unwrap",
            Category::Practices,
            Severity::Error,
            Location::new(PathBuf::from("a.swift"), 1, 5).with_span(4, 1),
            "force unwrap",
        )
        .with_suggestion(Suggestion::with_fix(
            "use optional chaining",
            Replacement::new(4, 1, "?"),
        ));
        let without = Violation::new(
            "SW007",
            "no-force-unwrap",
            Category::Practices,
            Severity::Error,
            Location::new(PathBuf::from("a.swift"), 2, 5).with_span(20, 1),
            "force unwrap",
        )
        .with_suggestion(Suggestion::new("no unambiguous rewrite"));

        let planned = plan_fixes(&[with_fix, without]);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].code, "SW007");
    }
}
