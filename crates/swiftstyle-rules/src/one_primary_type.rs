//! Rule to limit a file to one primary type declaration.
//!
//! # Rationale
//!
//! A file named after its primary type is the unit of navigation.
//! Extensions and type aliases ride along freely; a second class,
//! struct, enum, protocol, or actor at the top level belongs in its own
//! file.

use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Rule, Severity, Suggestion, Violation,
};

/// Rule code for one-primary-type.
pub const CODE: &str = "SW004";

/// Rule name for one-primary-type.
pub const NAME: &str = "one-primary-type";

/// Flags every top-level type declaration after the first.
#[derive(Debug, Clone)]
pub struct OnePrimaryType {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for OnePrimaryType {
    fn default() -> Self {
        Self::new()
    }
}

impl OnePrimaryType {
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

impl Rule for OnePrimaryType {
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
        "Limits a file to one top-level type declaration"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let mut primary: Option<(&str, usize)> = None;
        let mut violations = Vec::new();

        for decl in analysis.model.top_level() {
            if !decl.kind.is_type() {
                continue;
            }
            match primary {
                None => primary = Some((&decl.name, decl.line)),
                Some((first_name, first_line)) => {
                    let location =
                        Location::new(ctx.relative_path.clone(), decl.name_line, decl.name_column)
                            .with_span(decl.name_offset, decl.name_len);
                    violations.push(
                        Violation::new(
                            CODE,
                            NAME,
                            Category::FileStructure,
                            self.severity,
                            location,
                            format!(
                                "file already declares `{first_name}` (line {first_line}); \
                                 `{}` should live in its own file",
                                decl.name
                            ),
                        )
                        .with_suggestion(Suggestion::new(format!(
                            "Move `{}` to {}.swift",
                            decl.name, decl.name
                        ))),
                    );
                }
            }
        }

        violations
    }
}
