//! Rule to keep overloads of a function contiguous within their scope.
//!
//! Scattered overloads of the same name make a type's surface hard to
//! read as a unit. A later overload separated from the previous one by
//! any other declaration in the same scope is flagged.

use std::collections::HashMap;
use swiftstyle_core::model::DeclKind;
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Rule, Severity, Suggestion, Violation,
};

/// Rule code for group-overloads.
pub const CODE: &str = "SW009";

/// Rule name for group-overloads.
pub const NAME: &str = "group-overloads";

/// Flags non-contiguous function overloads within one scope.
#[derive(Debug, Clone)]
pub struct GroupOverloads {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for GroupOverloads {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupOverloads {
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

impl Rule for GroupOverloads {
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
        "Keeps function overloads contiguous within their scope"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        // Sibling position and last-seen overload position, keyed by
        // scope then name.
        let mut sibling_pos: HashMap<Option<usize>, usize> = HashMap::new();
        let mut last_seen: HashMap<(Option<usize>, &str), (usize, usize)> = HashMap::new();
        let mut violations = Vec::new();

        for decl in &analysis.model.declarations {
            let scope = decl.parent_index;
            let pos = sibling_pos.entry(scope).or_insert(0);
            let my_pos = *pos;
            *pos += 1;

            if decl.kind != DeclKind::Function {
                continue;
            }

            if let Some(&(prev_pos, prev_line)) = last_seen.get(&(scope, decl.name.as_str())) {
                if my_pos > prev_pos + 1 {
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
                                "overloads of `{}` should be grouped together (previous at line {prev_line})",
                                decl.name
                            ),
                        )
                        .with_suggestion(Suggestion::new(format!(
                            "Move this overload next to `{}` on line {prev_line}",
                            decl.name
                        ))),
                    );
                }
            }
            last_seen.insert((scope, decl.name.as_str()), (my_pos, decl.line));
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
        GroupOverloads::new().check(&ctx, &analysis)
    }

    #[test]
    fn detects_scattered_overloads() {
        let violations = check_code(
            "class API {\n    func fetch(id: Int) {}\n    func reset() {}\n    func fetch(name: String) {}\n}\n",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 4);
        assert!(violations[0].message.contains("line 2"));
    }

    #[test]
    fn contiguous_overloads_pass() {
        let violations = check_code(
            "class API {\n    func fetch(id: Int) {}\n    func fetch(name: String) {}\n    func reset() {}\n}\n",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn same_name_in_different_scopes_is_fine() {
        let violations = check_code(
            "class A {\n    func run() {}\n}\nclass B {\n    func pause() {}\n    func run() {}\n}\n",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn properties_between_overloads_break_the_group() {
        let violations = check_code(
            "struct S {\n    func draw() {}\n    var scale: Double = 1\n    func draw(in rect: Int) {}\n}\n",
        );
        assert_eq!(violations.len(), 1);
    }
}
