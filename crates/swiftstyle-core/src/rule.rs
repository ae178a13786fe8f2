//! Rule trait and per-file analysis context.

use crate::lexer::Token;
use crate::model::StructuralModel;
use crate::types::{Category, Severity, Violation};
use std::path::{Path, PathBuf};

/// Context provided to rules about the file being checked.
///
/// Contains metadata rules can use for context-aware decisions (e.g.,
/// skip checks in test files).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let is_test = Self::detect_test_file(&relative_path);

        Self {
            path,
            content,
            is_test,
            relative_path,
        }
    }

    /// Detects if a file is a test file based on path conventions.
    fn detect_test_file(path: &Path) -> bool {
        for component in path.components() {
            if let std::path::Component::Normal(s) = component {
                let s = s.to_string_lossy();
                if s == "Tests" || s == "UITests" || s.ends_with("Tests") {
                    return true;
                }
            }
        }

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with("Tests.swift") || file_name.ends_with("Test.swift") {
                return true;
            }
        }

        false
    }
}

/// The frozen per-file analysis every rule reads.
///
/// Built once per file, never mutated afterwards. Rules may read the
/// structural model, the raw token stream, or both.
#[derive(Debug)]
pub struct FileAnalysis {
    /// Position-tagged token stream.
    pub tokens: Vec<Token>,
    /// Structural summary derived from the tokens.
    pub model: StructuralModel,
}

/// A style rule evaluated against one file's frozen analysis.
///
/// Rules are pure: no shared mutable state, no dependency on the
/// evaluation order of other rules. The engine may run them in any order
/// or in parallel and must get the same violation set.
///
/// # Example
///
/// ```ignore
/// use swiftstyle_core::{Category, FileAnalysis, FileContext, Rule, Violation};
///
/// pub struct NoSemicolons;
///
/// impl Rule for NoSemicolons {
///     fn name(&self) -> &'static str { "no-semicolons" }
///     fn code(&self) -> &'static str { "SW900" }
///     fn category(&self) -> Category { Category::Formatting }
///
///     fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
///         // read analysis.tokens / analysis.model, return violations
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "type-casing").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SW001").
    fn code(&self) -> &'static str;

    /// Returns the rule category (reporting metadata only).
    fn category(&self) -> Category;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether this rule requires a reason on inline disable directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_disable_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn category(&self) -> Category {
            Category::Practices
        }
        fn default_severity(&self) -> Severity {
            Severity::Error
        }

        fn check(&self, ctx: &FileContext, _analysis: &FileAnalysis) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                self.category(),
                self.default_severity(),
                Location::new(ctx.relative_path.clone(), 1, 1),
                "test violation",
            )]
        }
    }

    #[test]
    fn rule_trait_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert!(rule.requires_disable_reason());
        assert_eq!(rule.description(), "");
    }

    #[test]
    fn detect_test_file() {
        assert!(FileContext::detect_test_file(Path::new(
            "Tests/AppTests/UserTests.swift"
        )));
        assert!(FileContext::detect_test_file(Path::new(
            "Sources/App/UserTests.swift"
        )));
        assert!(!FileContext::detect_test_file(Path::new(
            "Sources/App/User.swift"
        )));
    }
}
