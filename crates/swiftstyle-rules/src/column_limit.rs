//! Rule to limit line length.
//!
//! Columns count characters, not bytes; the per-line metrics come from
//! the structural model so the rule never re-scans the text. One
//! violation per overlong line, anchored at the first column past the
//! limit.

use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Rule, Severity, Suggestion, Violation,
};

/// Rule code for column-limit.
pub const CODE: &str = "SW005";

/// Rule name for column-limit.
pub const NAME: &str = "column-limit";

/// Flags lines whose last non-whitespace character sits past the limit.
#[derive(Debug, Clone)]
pub struct ColumnLimit {
    /// Maximum allowed columns.
    pub limit: usize,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ColumnLimit {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnLimit {
    /// Creates a new rule with the default 100-column limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            limit: swiftstyle_core::StyleConfig::default().column_limit,
            severity: Severity::Warning,
        }
    }

    /// Sets the column limit.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ColumnLimit {
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
        "Limits line length in columns"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        analysis
            .model
            .lines
            .iter()
            .filter(|l| l.last_column > self.limit)
            .map(|l| {
                let location =
                    Location::new(ctx.relative_path.clone(), l.number, self.limit + 1)
                        .with_span(l.offset, l.len);
                Violation::new(
                    CODE,
                    NAME,
                    Category::Formatting,
                    self.severity,
                    location,
                    format!(
                        "line is {} columns, over the {}-column limit",
                        l.last_column, self.limit
                    ),
                )
                .with_suggestion(Suggestion::new("Break the line"))
            })
            .collect()
    }
}
