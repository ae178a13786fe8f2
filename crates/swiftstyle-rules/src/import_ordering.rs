//! Rule to enforce import grouping and ordering.
//!
//! # Rationale
//!
//! Imports read fastest in a fixed shape: plain module imports first,
//! declaration imports (`import class Foo.Bar`) second, `@testable`
//! imports last, each group sorted lexicographically and separated from
//! the next by a blank line.
//!
//! No fix is offered: reordering imports moves non-adjacent lines, which
//! is outside the single-pass replacement model.

use swiftstyle_core::model::{ImportEntry, ImportGroup};
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Rule, Severity, Suggestion, Violation,
};

/// Rule code for import-ordering.
pub const CODE: &str = "SW003";

/// Rule name for import-ordering.
pub const NAME: &str = "import-ordering";

/// Enforces group order, in-group sorting, and blank-line separation of
/// import statements.
#[derive(Debug, Clone)]
pub struct ImportOrdering {
    /// Require a blank line between adjacent import groups.
    pub require_group_separation: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ImportOrdering {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportOrdering {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            require_group_separation: true,
            severity: Severity::Warning,
        }
    }

    /// Sets whether groups must be separated by a blank line.
    #[must_use]
    pub fn require_group_separation(mut self, require: bool) -> Self {
        self.require_group_separation = require;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn group_label(group: ImportGroup) -> &'static str {
        match group {
            ImportGroup::Module => "module",
            ImportGroup::Declaration => "declaration",
            ImportGroup::Testable => "@testable",
        }
    }

    fn location(ctx: &FileContext, entry: &ImportEntry) -> Location {
        Location::new(ctx.relative_path.clone(), entry.line, 1)
            .with_span(entry.offset, entry.len)
    }

    fn violation(&self, ctx: &FileContext, entry: &ImportEntry, message: String) -> Violation {
        Violation::new(
            CODE,
            NAME,
            Category::FileStructure,
            self.severity,
            Self::location(ctx, entry),
            message,
        )
        .with_suggestion(Suggestion::new(
            "Order imports: modules, then declaration imports, then @testable, \
             each group sorted and separated by a blank line",
        ))
    }

    fn has_blank_line_between(content: &str, from_line: usize, to_line: usize) -> bool {
        content
            .lines()
            .skip(from_line)
            .take(to_line.saturating_sub(from_line + 1))
            .any(|l| l.trim().is_empty())
    }
}

impl Rule for ImportOrdering {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn category(&self) -> Category {
        Category::FileStructure
    }

    fn description(&self) -> &'static str {
        "Enforces import group order and lexicographic sorting"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let imports = &analysis.model.imports;
        let mut violations = Vec::new();

        // Group order: each import must not belong to an earlier group
        // than one already seen.
        let mut max_seen: Option<(ImportGroup, usize)> = None;
        for entry in imports {
            if let Some((seen_group, seen_line)) = max_seen {
                if entry.group < seen_group {
                    violations.push(self.violation(
                        ctx,
                        entry,
                        format!(
                            "{} import `{}` should precede the {} imports (line {seen_line})",
                            Self::group_label(entry.group),
                            entry.module,
                            Self::group_label(seen_group),
                        ),
                    ));
                    continue;
                }
            }
            if max_seen.map_or(true, |(g, _)| entry.group > g) {
                max_seen = Some((entry.group, entry.line));
            }
        }

        // In-group sorting and blank-line separation, over adjacent pairs.
        for pair in imports.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.group == prev.group {
                if next.module < prev.module {
                    violations.push(self.violation(
                        ctx,
                        next,
                        format!(
                            "import `{}` should precede `{}` (line {})",
                            next.module, prev.module, prev.line
                        ),
                    ));
                }
            } else if self.require_group_separation
                && next.group > prev.group
                && !Self::has_blank_line_between(ctx.content, prev.line, next.line)
            {
                violations.push(self.violation(
                    ctx,
                    next,
                    format!(
                        "expected a blank line before the {} import group",
                        Self::group_label(next.group)
                    ),
                ));
            }
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
        ImportOrdering::new().check(&ctx, &analysis)
    }

    #[test]
    fn detects_unsorted_imports() {
        let violations = check_code("import UIKit\nimport Foundation\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 2);
        assert!(violations[0].message.contains("Foundation"));
        assert!(violations[0].message.contains("UIKit"));
        assert!(violations[0].message.contains("line 1"));
    }

    #[test]
    fn sorted_imports_pass() {
        let violations = check_code("import Foundation\nimport UIKit\n");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn testable_must_come_last() {
        let violations = check_code(
            "@testable import MyApp\nimport Foundation\n",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 2);
        assert!(violations[0].message.contains("@testable"));
    }

    #[test]
    fn missing_blank_line_between_groups() {
        let violations = check_code(
            "import Foundation\n@testable import MyApp\n",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("blank line"));
    }

    #[test]
    fn separated_groups_pass() {
        let violations = check_code(
            "import Foundation\nimport UIKit\n\nimport class MyKit.Widget\n\n@testable import MyApp\n",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn one_violation_per_inversion() {
        let violations = check_code("import C\nimport A\nimport B\n");
        // A < C is one inversion; B > A so the second pair is ordered.
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn no_imports_no_violations() {
        assert!(check_code("class Foo {}\n").is_empty());
    }
}
