//! Rule to require documentation comments on public API.
//!
//! # Rationale
//!
//! `public` and `open` declarations are consumed outside the module;
//! a `///` block is the only description a downstream reader gets.
//!
//! # Configuration
//!
//! - `require_type_docs`: check types (default: true)
//! - `require_function_docs`: check functions and initializers (default: true)
//! - `require_property_docs`: check properties (default: true)

use swiftstyle_core::model::{AccessLevel, DeclKind};
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Rule, Severity, Suggestion, Violation,
};

/// Rule code for doc-public-api.
pub const CODE: &str = "SW010";

/// Rule name for doc-public-api.
pub const NAME: &str = "doc-public-api";

/// Requires a doc comment on `public` and `open` declarations.
#[derive(Debug, Clone)]
pub struct DocPublicApi {
    /// Require docs on public types.
    pub require_type_docs: bool,
    /// Require docs on public functions and initializers.
    pub require_function_docs: bool,
    /// Require docs on public properties.
    pub require_property_docs: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for DocPublicApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DocPublicApi {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            require_type_docs: true,
            require_function_docs: true,
            require_property_docs: true,
            severity: Severity::Warning,
        }
    }

    /// Sets whether public types require docs.
    #[must_use]
    pub fn require_type_docs(mut self, require: bool) -> Self {
        self.require_type_docs = require;
        self
    }

    /// Sets whether public functions require docs.
    #[must_use]
    pub fn require_function_docs(mut self, require: bool) -> Self {
        self.require_function_docs = require;
        self
    }

    /// Sets whether public properties require docs.
    #[must_use]
    pub fn require_property_docs(mut self, require: bool) -> Self {
        self.require_property_docs = require;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn wants(&self, kind: DeclKind) -> Option<&'static str> {
        match kind {
            k if k.is_type() || k == DeclKind::TypeAlias => {
                self.require_type_docs.then_some("type")
            }
            DeclKind::Function | DeclKind::Initializer | DeclKind::Subscript => {
                self.require_function_docs.then_some("function")
            }
            DeclKind::Property => self.require_property_docs.then_some("property"),
            _ => None,
        }
    }
}

impl Rule for DocPublicApi {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn category(&self) -> Category {
        Category::Practices
    }

    fn description(&self) -> &'static str {
        "Requires documentation on public and open declarations"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let mut violations = Vec::new();

        for decl in &analysis.model.declarations {
            if !matches!(decl.access, AccessLevel::Public | AccessLevel::Open) {
                continue;
            }
            if decl.has_doc_comment {
                continue;
            }
            let Some(label) = self.wants(decl.kind) else {
                continue;
            };

            let location =
                Location::new(ctx.relative_path.clone(), decl.name_line, decl.name_column)
                    .with_span(decl.name_offset, decl.name_len);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    Category::Practices,
                    self.severity,
                    location,
                    format!("public {label} `{}` is missing documentation", decl.name),
                )
                .with_suggestion(Suggestion::new(
                    "Add a `///` documentation comment above the declaration",
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
        DocPublicApi::new().check(&ctx, &analysis)
    }

    #[test]
    fn detects_undocumented_public_type() {
        let violations = check_code("public struct User {}\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("User"));
    }

    #[test]
    fn documented_public_type_passes() {
        let violations = check_code("/// A registered user.\npublic struct User {}\n");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn internal_declarations_are_ignored() {
        let violations = check_code("struct User {}\ninternal func helper() {}\n");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn detects_undocumented_open_function() {
        let violations = check_code(
            "/// Base controller.\nopen class Base {\n    open func reload() {}\n}\n",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("reload"));
    }

    #[test]
    fn blank_line_detaches_the_doc_block() {
        let violations = check_code("/// Stale comment.\n\npublic struct User {}\n");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn property_docs_can_be_waived() {
        let code = "public struct User {\n    /// Documented.\n    public var a: Int = 0\n    public var b: Int = 0\n}\n";
        assert_eq!(check_code(code).len(), 2); // struct + b
        let waived = {
            let tokens = tokenize(code);
            let model = model::build(code, &tokens).expect("build failed");
            let analysis = FileAnalysis { tokens, model };
            let ctx = FileContext::new(Path::new("/p/S.swift"), code, Path::new("/p"));
            DocPublicApi::new()
                .require_property_docs(false)
                .check(&ctx, &analysis)
        };
        assert_eq!(waived.len(), 1); // struct only
    }
}
