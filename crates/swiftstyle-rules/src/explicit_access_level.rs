//! Rule to require an explicit access-level keyword on declarations.
//!
//! # Rationale
//!
//! An omitted access level silently means `internal`. Spelling it out
//! makes API surface review mechanical. The fix inserts `internal `
//! before the declaration keyword, which never changes behavior.
//!
//! Members that cannot or need not carry a keyword are skipped: enum
//! cases, protocol requirements, locals inside function bodies, and
//! members of `private`/`fileprivate` types.

use swiftstyle_core::model::{AccessLevel, DeclKind};
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Replacement, Rule, Severity, Suggestion,
    Violation,
};

/// Rule code for explicit-access-level.
pub const CODE: &str = "SW008";

/// Rule name for explicit-access-level.
pub const NAME: &str = "explicit-access-level";

/// Flags declarations without an access-level keyword.
#[derive(Debug, Clone)]
pub struct ExplicitAccessLevel {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ExplicitAccessLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplicitAccessLevel {
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
}

impl Rule for ExplicitAccessLevel {
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
        "Requires an explicit access-level keyword on declarations"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let mut violations = Vec::new();

        for decl in &analysis.model.declarations {
            if decl.access != AccessLevel::Unspecified {
                continue;
            }
            // Kinds that never take a keyword, or name an existing type.
            if matches!(decl.kind, DeclKind::EnumCase | DeclKind::Extension) {
                continue;
            }
            if decl.name == "deinit" {
                continue;
            }
            // Protocol requirements and locals cannot carry one.
            if matches!(
                decl.parent_kind,
                Some(
                    DeclKind::Protocol
                        | DeclKind::Function
                        | DeclKind::Initializer
                        | DeclKind::Subscript
                        | DeclKind::Property
                )
            ) {
                continue;
            }
            // Inside a private type the member level is already capped.
            if decl.parent_access.is_some_and(AccessLevel::is_restricted) {
                continue;
            }

            let location = Location::new(ctx.relative_path.clone(), decl.line, decl.column)
                .with_span(decl.offset, decl.name_offset + decl.name_len - decl.offset);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    Category::Practices,
                    self.severity,
                    location,
                    format!("`{}` has no explicit access level", decl.name),
                )
                .with_suggestion(Suggestion::with_fix(
                    "State the intended level (inserting `internal` keeps current behavior)",
                    Replacement::new(decl.offset, 0, "internal "),
                )),
            );
        }

        violations
    }
}
