//! Rendering of lint results for the terminal.
//!
//! The per-violation layouts live on the core types (`Violation::format`
//! for the block form, `Display` for the one-line form); this module only
//! assembles them into a report and picks the summary color.

use anyhow::Result;
use swiftstyle_core::{LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result, true)),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

/// Violation blocks followed by a one-line summary.
fn render_text(result: &LintResult, color: bool) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for violation in &result.violations {
        let _ = writeln!(out, "{}", violation.format());
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let tone = summary_tone(result);
    let (open, close) = if color { (tone, "\x1b[0m") } else { ("", "") };
    let _ = writeln!(
        out,
        "{open}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s){close}",
        result.files_checked
    );
    out
}

/// `path:line:column: severity [code] message`, one violation per line.
fn render_compact(result: &LintResult) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for violation in &result.violations {
        let _ = writeln!(out, "{violation}");
    }
    out
}

/// ANSI color for the summary line, keyed to the worst severity present.
fn summary_tone(result: &LintResult) -> &'static str {
    if result.has_errors() {
        "\x1b[31m"
    } else if result.has_violations_at(Severity::Warning) {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use swiftstyle_core::{Category, Location, Suggestion, Violation};

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations.push(
            Violation::new(
                "SW001",
                "type-casing",
                Category::Naming,
                Severity::Warning,
                Location::new(PathBuf::from("Sources/App.swift"), 3, 7).with_span(20, 6),
                "`myType` should be `MyType`",
            )
            .with_suggestion(Suggestion::new("Rename to `MyType`")),
        );
        result.violations.push(Violation::new(
            "SW007",
            "no-force-unwrap",
            Category::Practices,
            Severity::Error,
            Location::new(PathBuf::from("Sources/App.swift"), 9, 16).with_span(88, 1),
            "force unwrap of an optional value",
        ));
        result
    }

    #[test]
    fn text_report_uses_violation_blocks_and_counts() {
        let rendered = render_text(&sample(), false);
        assert!(rendered.contains("SW001 type-casing at Sources/App.swift:3:7"));
        assert!(rendered.contains("= help: Rename to `MyType`"));
        assert!(rendered.contains("Found 1 error(s), 1 warning(s), 0 info(s) in 2 file(s)"));
    }

    #[test]
    fn compact_lines_match_violation_display() {
        let result = sample();
        let rendered = render_compact(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], result.violations[0].to_string());
        assert_eq!(
            lines[1],
            "Sources/App.swift:9:16: error [SW007] force unwrap of an optional value"
        );
    }

    #[test]
    fn summary_tone_tracks_worst_severity() {
        let mut clean = LintResult::new();
        clean.files_checked = 1;
        assert_eq!(summary_tone(&clean), "\x1b[32m");
        clean.violations.push(Violation::new(
            "SW005",
            "column-limit",
            Category::Formatting,
            Severity::Warning,
            Location::new(PathBuf::from("a.swift"), 1, 101).with_span(100, 1),
            "line exceeds 100 columns",
        ));
        assert_eq!(summary_tone(&clean), "\x1b[33m");
        assert_eq!(summary_tone(&sample()), "\x1b[31m");
    }
}
