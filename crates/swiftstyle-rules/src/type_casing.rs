//! Rule to enforce the base casing shape of declared names.
//!
//! # Rationale
//!
//! Types read as UpperCamelCase and members as lowerCamelCase in
//! idiomatic Swift. A name with the wrong gross shape (wrong first-letter
//! case, or underscores) is flagged with the mechanically derived
//! expected form.
//!
//! # Detected Patterns
//!
//! - `class myViewController` (type with lowercase start)
//! - `var URL: String` (property with uppercase start)
//! - `func Fetch_data()` (function with uppercase start or underscores)
//! - parameter names with the wrong shape
//!
//! Acronym rendering inside an otherwise well-shaped name is the
//! acronym-casing rule's concern, not this one's.

use crate::casing;
use swiftstyle_core::lexer::TokenKind;
use swiftstyle_core::model::{DeclKind, Declaration};
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Replacement, Rule, Severity, Suggestion,
    Violation,
};

/// Rule code for type-casing.
pub const CODE: &str = "SW001";

/// Rule name for type-casing.
pub const NAME: &str = "type-casing";

/// Enforces UpperCamelCase for types and lowerCamelCase for members.
#[derive(Debug, Clone)]
pub struct TypeCasing {
    /// Acronyms rendered as a unit when deriving the expected name.
    pub acronyms: Vec<String>,
    /// Check function parameter names as well as declarations.
    pub check_parameters: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for TypeCasing {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCasing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            acronyms: swiftstyle_core::StyleConfig::default().acronyms,
            check_parameters: true,
            severity: Severity::Warning,
        }
    }

    /// Sets the acronym list.
    #[must_use]
    pub fn acronyms(mut self, acronyms: Vec<String>) -> Self {
        self.acronyms = acronyms;
        self
    }

    /// Sets whether parameter names are checked.
    #[must_use]
    pub fn check_parameters(mut self, check: bool) -> Self {
        self.check_parameters = check;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn expected_shape(kind: DeclKind) -> Option<Shape> {
        match kind {
            DeclKind::Class
            | DeclKind::Struct
            | DeclKind::Enum
            | DeclKind::Protocol
            | DeclKind::Actor
            | DeclKind::TypeAlias
            | DeclKind::EnumCase => Some(Shape::UpperCamel),
            DeclKind::Function | DeclKind::Property => Some(Shape::LowerCamel),
            // Extensions name an existing type; init/subscript use keywords.
            DeclKind::Extension | DeclKind::Initializer | DeclKind::Subscript => None,
        }
    }

    fn kind_label(kind: DeclKind) -> &'static str {
        match kind {
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Protocol => "protocol",
            DeclKind::Actor => "actor",
            DeclKind::TypeAlias => "type alias",
            DeclKind::Function => "function",
            DeclKind::Property => "property",
            DeclKind::EnumCase => "enum case",
            DeclKind::Extension | DeclKind::Initializer | DeclKind::Subscript => "declaration",
        }
    }

    fn violation_for(
        &self,
        ctx: &FileContext,
        label: &str,
        name: &str,
        shape: Shape,
        line: usize,
        column: usize,
        offset: usize,
        len: usize,
    ) -> Option<Violation> {
        if !casing::is_checkable(name) {
            return None;
        }
        let (ok, expected, style_name) = match shape {
            Shape::UpperCamel => (
                casing::has_upper_camel_shape(name),
                casing::upper_camel(name, &self.acronyms),
                "UpperCamelCase",
            ),
            Shape::LowerCamel => (
                casing::has_lower_camel_shape(name),
                casing::lower_camel(name, &self.acronyms),
                "lowerCamelCase",
            ),
        };
        if ok || expected == name || expected.is_empty() {
            return None;
        }

        let location = Location::new(ctx.relative_path.clone(), line, column).with_span(offset, len);
        Some(
            Violation::new(
                CODE,
                NAME,
                Category::Naming,
                self.severity,
                location,
                format!("{label} `{name}` should be {style_name}: `{expected}`"),
            )
            .with_suggestion(Suggestion::with_fix(
                format!("Rename to `{expected}`"),
                Replacement::new(offset, len, expected),
            )),
        )
    }

    /// Scans a function's parameter list for mis-shaped labels and names.
    fn check_parameter_names(
        &self,
        ctx: &FileContext,
        analysis: &FileAnalysis,
        decl: &Declaration,
        violations: &mut Vec<Violation>,
    ) {
        let toks: Vec<_> = analysis
            .tokens
            .iter()
            .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
            .collect();

        let decl_end = decl.offset + decl.len;
        let name_end = decl.name_offset + decl.name_len;
        let Some(open) = toks.iter().position(|t| {
            t.offset >= name_end && t.offset < decl_end && t.text == "(" && t.kind == TokenKind::Punct
        }) else {
            return;
        };
        // Generic parameter lists sit between the name and the paren; a
        // body brace before any paren means there is no parameter list.
        if toks[..open]
            .iter()
            .any(|t| t.offset >= name_end && t.text == "{")
        {
            return;
        }

        let mut depth = 0usize;
        let mut seen = std::collections::HashSet::new();
        for (i, tok) in toks.iter().enumerate().skip(open) {
            match tok.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            if depth != 1 || tok.kind != TokenKind::Identifier {
                continue;
            }
            // `label name: Type` or `name: Type`; the first identifier
            // follows `(` or `,`, an internal name follows the label and
            // precedes `:`.
            let is_label = matches!(toks[i - 1].text.as_str(), "(" | ",");
            let is_internal = toks[i - 1].kind == TokenKind::Identifier
                && toks.get(i + 1).is_some_and(|t| t.text == ":")
                && matches!(toks[i - 2].text.as_str(), "(" | ",");
            if !(is_label || is_internal) {
                continue;
            }
            if !seen.insert(tok.offset) {
                continue;
            }
            if let Some(v) = self.violation_for(
                ctx,
                "parameter",
                &tok.text,
                Shape::LowerCamel,
                tok.line,
                tok.column,
                tok.offset,
                tok.len,
            ) {
                violations.push(v);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Shape {
    UpperCamel,
    LowerCamel,
}

impl Rule for TypeCasing {
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
        "Enforces UpperCamelCase types and lowerCamelCase members"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        let mut violations = Vec::new();

        for decl in &analysis.model.declarations {
            let Some(shape) = Self::expected_shape(decl.kind) else {
                continue;
            };
            if let Some(v) = self.violation_for(
                ctx,
                Self::kind_label(decl.kind),
                &decl.name,
                shape,
                decl.name_line,
                decl.name_column,
                decl.name_offset,
                decl.name_len,
            ) {
                violations.push(v);
            }

            if self.check_parameters
                && matches!(decl.kind, DeclKind::Function | DeclKind::Initializer)
            {
                self.check_parameter_names(ctx, analysis, decl, &mut violations);
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
        TypeCasing::new().check(&ctx, &analysis)
    }

    #[test]
    fn detects_lowercase_class() {
        let violations = check_code("class myViewController {}\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert!(violations[0].message.contains("MyViewController"));
        assert!(violations[0].has_fix());
    }

    #[test]
    fn detects_uppercase_property() {
        let violations = check_code("class MyViewController {\n    var URL: String = \"\"\n}\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains('`') && violations[0].message.contains("url"));
    }

    #[test]
    fn allows_well_shaped_names() {
        let violations = check_code(
            "struct HTTPClient {\n    let baseURL: String\n    func fetchData(from endpoint: String) {}\n}\n",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn detects_snake_case_function() {
        let violations = check_code("func fetch_user_data() {}\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("fetchUserData"));
    }

    #[test]
    fn detects_bad_parameter_name() {
        let violations = check_code("func greet(UserName: String) {}\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("parameter"));
        assert!(violations[0].message.contains("userName"));
    }

    #[test]
    fn wildcard_parameter_label_is_skipped() {
        let violations = check_code("func greet(_ name: String) {}\n");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn backticked_and_underscored_names_are_skipped() {
        let violations = check_code("let `class` = 1\nvar _cache: Int = 0\n");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn fix_targets_the_name_token() {
        let code = "class myViewController {}\n";
        let violations = check_code(code);
        let replacement = violations[0]
            .suggestion
            .as_ref()
            .and_then(|s| s.replacement.as_ref())
            .expect("fix expected");
        assert_eq!(&code[replacement.offset..replacement.offset + replacement.length], "myViewController");
        assert_eq!(replacement.new_text, "MyViewController");
    }

    #[test]
    fn enum_cases_are_upper_camel() {
        let violations = check_code("enum Direction {\n    case North\n    case south\n}\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("South"));
    }
}
