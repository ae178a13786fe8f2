//! Rule to enforce consistent acronym rendering inside identifiers.
//!
//! # Rationale
//!
//! Configured acronyms read as a unit: uppercase in the middle or end of
//! a name (`baseURL`, `URLParser`) and fully lowercase only when they
//! start a lowerCamelCase name (`urlString`). Mixed renderings like
//! `parseUrl` or `HttpClient` are flagged.
//!
//! Names whose gross shape is already wrong are the type-casing rule's
//! concern; this rule only fires on otherwise well-shaped names so the
//! two never double-report.

use crate::casing;
use swiftstyle_core::model::DeclKind;
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Replacement, Rule, Severity, Suggestion,
    Violation,
};

/// Rule code for acronym-casing.
pub const CODE: &str = "SW002";

/// Rule name for acronym-casing.
pub const NAME: &str = "acronym-casing";

/// Enforces the configured rendering of acronyms inside identifiers.
#[derive(Debug, Clone)]
pub struct AcronymCasing {
    /// Acronyms rendered as a unit (configured casing, e.g. `URL`).
    pub acronyms: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for AcronymCasing {
    fn default() -> Self {
        Self::new()
    }
}

impl AcronymCasing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            acronyms: swiftstyle_core::StyleConfig::default().acronyms,
            severity: Severity::Warning,
        }
    }

    /// Sets the acronym list.
    #[must_use]
    pub fn acronyms(mut self, acronyms: Vec<String>) -> Self {
        self.acronyms = acronyms;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for AcronymCasing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn description(&self) -> &'static str {
        "Enforces consistent acronym rendering in identifiers"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let mut violations = Vec::new();

        for decl in &analysis.model.declarations {
            if !casing::is_checkable(&decl.name) {
                continue;
            }
            let (shape_ok, expected) = match decl.kind {
                DeclKind::Class
                | DeclKind::Struct
                | DeclKind::Enum
                | DeclKind::Protocol
                | DeclKind::Actor
                | DeclKind::TypeAlias
                | DeclKind::EnumCase => (
                    casing::has_upper_camel_shape(&decl.name),
                    casing::upper_camel(&decl.name, &self.acronyms),
                ),
                DeclKind::Function | DeclKind::Property => (
                    casing::has_lower_camel_shape(&decl.name),
                    casing::lower_camel(&decl.name, &self.acronyms),
                ),
                DeclKind::Extension | DeclKind::Initializer | DeclKind::Subscript => continue,
            };
            if !shape_ok || expected == decl.name || expected.is_empty() {
                continue;
            }

            let location =
                Location::new(ctx.relative_path.clone(), decl.name_line, decl.name_column)
                    .with_span(decl.name_offset, decl.name_len);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    Category::Naming,
                    self.severity,
                    location,
                    format!(
                        "`{}` renders an acronym inconsistently: `{expected}`",
                        decl.name
                    ),
                )
                .with_suggestion(Suggestion::with_fix(
                    format!("Rename to `{expected}`"),
                    Replacement::new(decl.name_offset, decl.name_len, expected),
                )),
            );
        }

        violations
    }
}
