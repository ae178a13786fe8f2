//! Rule to forbid multiple statements on one line.
//!
//! A semicolon followed by more code on the same line hides a statement
//! from line-oriented review. The fix replaces the semicolon and the gap
//! after it with a newline at the current line's indentation. A trailing
//! semicolon before a line break or a closing brace is left alone.

use swiftstyle_core::lexer::TokenKind;
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Replacement, Rule, Severity, Suggestion,
    Violation,
};

/// Rule code for statement-per-line.
pub const CODE: &str = "SW006";

/// Rule name for statement-per-line.
pub const NAME: &str = "statement-per-line";

/// Flags semicolon-joined statements on a single line.
#[derive(Debug, Clone)]
pub struct StatementPerLine {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for StatementPerLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementPerLine {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Leading whitespace of the line holding `line_number`.
    fn line_indent(ctx: &FileContext, analysis: &FileAnalysis, line_number: usize) -> String {
        analysis
            .model
            .lines
            .get(line_number - 1)
            .map(|info| {
                ctx.content[info.offset..info.offset + info.len]
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Rule for StatementPerLine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn category(&self) -> Category {
        Category::Formatting
    }

    fn description(&self) -> &'static str {
        "Forbids semicolon-joined statements on one line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let toks: Vec<_> = analysis
            .tokens
            .iter()
            .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
            .collect();

        let mut violations = Vec::new();
        for pair in toks.windows(2) {
            let (semi, next) = (pair[0], pair[1]);
            if semi.text != ";" || semi.kind != TokenKind::Punct {
                continue;
            }
            if next.line != semi.line || next.text == "}" {
                continue;
            }

            let indent = Self::line_indent(ctx, analysis, semi.line);
            let location =
                Location::new(ctx.relative_path.clone(), semi.line, semi.column)
                    .with_span(semi.offset, semi.len);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    Category::Formatting,
                    self.severity,
                    location,
                    "multiple statements on one line",
                )
                .with_suggestion(Suggestion::with_fix(
                    "Put each statement on its own line",
                    Replacement::new(
                        semi.offset,
                        next.offset - semi.offset,
                        format!("\n{indent}"),
                    ),
                )),
            );
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use swiftstyle_core::lexer::tokenize;
    use swiftstyle_core::model;

    fn check_code(code: &str) -> Vec<Violation> {
        let tokens = tokenize(code);
        let model = model::build(code, &tokens).expect("build failed");
        let analysis = FileAnalysis { tokens, model };
        let ctx = FileContext::new(Path::new("/p/Sources/Test.swift"), code, Path::new("/p"));
        StatementPerLine::new().check(&ctx, &analysis)
    }

    #[test]
    fn detects_joined_statements() {
        let violations = check_code("let a = 1; let b = 2\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].has_fix());
    }

    #[test]
    fn trailing_semicolon_is_ignored() {
        assert!(check_code("let a = 1;\nlet b = 2\n").is_empty());
    }

    #[test]
    fn semicolon_before_closing_brace_is_ignored() {
        assert!(check_code("func f() { return; }\n").is_empty());
    }

    #[test]
    fn fix_preserves_indentation() {
        let code = "    let a = 1; let b = 2\n";
        let violations = check_code(code);
        let replacement = violations[0]
            .suggestion
            .as_ref()
            .and_then(|s| s.replacement.as_ref())
            .expect("fix expected");
        assert_eq!(replacement.new_text, "\n    ");
        let fixed = {
            let mut s = code.to_string();
            s.replace_range(
                replacement.offset..replacement.offset + replacement.length,
                &replacement.new_text,
            );
            s
        };
        assert_eq!(fixed, "    let a = 1\n    let b = 2\n");
    }

    #[test]
    fn each_extra_statement_is_flagged() {
        let violations = check_code("a(); b(); c()\n");
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn semicolon_inside_string_is_ignored() {
        assert!(check_code("let s = \"a; b\"\n").is_empty());
    }
}
