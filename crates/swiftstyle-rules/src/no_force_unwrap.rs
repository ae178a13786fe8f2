//! Rule to forbid force unwrapping of optionals.
//!
//! # Rationale
//!
//! A postfix `!` crashes the process when the value is nil. Production
//! code should unwrap explicitly or chain optionally.
//!
//! # Detected Patterns
//!
//! - `user!.name`, `values[0]!`, `find()!`
//! - implicitly unwrapped optional types (`var label: UILabel!`)
//!
//! `try!`, `as!`, prefix negation, and the `!=` operator are not force
//! unwraps and are never flagged.
//!
//! # Configuration
//!
//! - `allow_in_tests`: skip test files (default: true)
//! - `allow_path_globs`: extra path patterns to skip
//! - `allow_attributes`: attribute names whose declarations are exempt
//!   (default: `IBOutlet`)
//! - `allow_in_fatal_error_paths`: exempt unwraps inside functions that
//!   call `fatalError` (default: true)
//!
//! # Suppression
//!
//! `// swiftstyle:disable no-force-unwrap reason="..."`; the reason is
//! required because this rule defaults to error severity.

use swiftstyle_core::lexer::{Token, TokenKind};
use swiftstyle_core::model::{DeclKind, Declaration};
use swiftstyle_core::{
    Category, FileAnalysis, FileContext, Location, Replacement, Rule, Severity, Suggestion,
    Violation,
};

/// Rule code for no-force-unwrap.
pub const CODE: &str = "SW007";

/// Rule name for no-force-unwrap.
pub const NAME: &str = "no-force-unwrap";

/// Forbids postfix `!` on expressions and types.
#[derive(Debug, Clone)]
pub struct NoForceUnwrap {
    /// Skip test files.
    pub allow_in_tests: bool,
    /// Relative-path globs exempt from this rule.
    pub allow_path_globs: Vec<String>,
    /// Attributes whose annotated declarations are exempt.
    pub allow_attributes: Vec<String>,
    /// Exempt unwraps inside functions that call `fatalError`.
    pub allow_in_fatal_error_paths: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoForceUnwrap {
    fn default() -> Self {
        Self::new()
    }
}

impl NoForceUnwrap {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_in_tests: true,
            allow_path_globs: Vec::new(),
            allow_attributes: vec!["IBOutlet".to_string()],
            allow_in_fatal_error_paths: true,
            severity: Severity::Error,
        }
    }

    /// Sets whether test files are skipped.
    #[must_use]
    pub fn allow_in_tests(mut self, allow: bool) -> Self {
        self.allow_in_tests = allow;
        self
    }

    /// Sets the exempt path globs.
    #[must_use]
    pub fn allow_path_globs(mut self, globs: Vec<String>) -> Self {
        self.allow_path_globs = globs;
        self
    }

    /// Sets the exempting attribute names.
    #[must_use]
    pub fn allow_attributes(mut self, attributes: Vec<String>) -> Self {
        self.allow_attributes = attributes;
        self
    }

    /// Sets whether fatal-error paths are exempt.
    #[must_use]
    pub fn allow_in_fatal_error_paths(mut self, allow: bool) -> Self {
        self.allow_in_fatal_error_paths = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn path_is_exempt(&self, ctx: &FileContext) -> bool {
        let path = ctx.relative_path.to_string_lossy();
        self.allow_path_globs
            .iter()
            .filter_map(|g| glob::Pattern::new(g).ok())
            .any(|p| p.matches(&path))
    }

    /// Innermost declaration whose span contains `offset`, then the chain
    /// of its parents.
    fn enclosing_chain<'m>(
        declarations: &'m [Declaration],
        offset: usize,
    ) -> Vec<&'m Declaration> {
        let innermost = declarations
            .iter()
            .enumerate()
            .filter(|(_, d)| d.offset <= offset && offset < d.offset + d.len)
            .max_by_key(|(_, d)| d.offset);

        let mut chain = Vec::new();
        let mut cursor = innermost;
        while let Some((idx, decl)) = cursor {
            chain.push(decl);
            cursor = decl
                .parent_index
                .and_then(|p| declarations.get(p).map(|d| (p, d)));
            if cursor.map_or(false, |(p, _)| p >= idx) {
                break;
            }
        }
        chain
    }

    fn decl_is_exempt(&self, analysis: &FileAnalysis, chain: &[&Declaration]) -> bool {
        if chain.iter().any(|d| {
            d.attributes
                .iter()
                .any(|a| self.allow_attributes.iter().any(|allowed| allowed == a))
        }) {
            return true;
        }

        if self.allow_in_fatal_error_paths {
            if let Some(func) = chain
                .iter()
                .find(|d| matches!(d.kind, DeclKind::Function | DeclKind::Initializer))
            {
                let end = func.offset + func.len;
                return analysis.tokens.iter().any(|t| {
                    t.kind == TokenKind::Identifier
                        && t.text == "fatalError"
                        && t.offset >= func.offset
                        && t.offset < end
                });
            }
        }

        false
    }

    fn is_postfix_bang(prev: &Token, tok: &Token) -> bool {
        if tok.text != "!" || tok.kind != TokenKind::Punct {
            return false;
        }
        // Postfix means no gap before the bang; `try!`/`as!` follow
        // keywords and prefix negation follows punctuation.
        if prev.offset + prev.len != tok.offset {
            return false;
        }
        prev.kind == TokenKind::Identifier
            || (prev.kind == TokenKind::Punct && matches!(prev.text.as_str(), ")" | "]"))
    }
}

impl Rule for NoForceUnwrap {
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
        "Forbids force unwrapping of optionals"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
        if self.allow_in_tests && ctx.is_test {
            tracing::debug!("Skipping test file: {}", ctx.relative_path.display());
            return Vec::new();
        }
        if self.path_is_exempt(ctx) {
            tracing::debug!("Skipping allowlisted path: {}", ctx.relative_path.display());
            return Vec::new();
        }

        let toks: Vec<_> = analysis
            .tokens
            .iter()
            .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
            .collect();

        let mut violations = Vec::new();
        for i in 1..toks.len() {
            let (prev, tok) = (toks[i - 1], toks[i]);
            if !Self::is_postfix_bang(prev, tok) {
                continue;
            }

            let chain = Self::enclosing_chain(&analysis.model.declarations, tok.offset);
            if self.decl_is_exempt(analysis, &chain) {
                continue;
            }

            let location = Location::new(ctx.relative_path.clone(), tok.line, tok.column)
                .with_span(tok.offset, tok.len);
            let suggestion = match toks.get(i + 1) {
                // `expr!.member` rewrites safely to `expr?.member`.
                Some(next) if next.text == "." && next.offset == tok.offset + tok.len => {
                    Suggestion::with_fix(
                        "Use optional chaining (`?.`)",
                        Replacement::new(tok.offset, tok.len, "?"),
                    )
                }
                _ => Suggestion::new("Unwrap with `if let` or `guard let`"),
            };

            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    Category::Practices,
                    self.severity,
                    location,
                    "force unwrap of an optional value",
                )
                .with_suggestion(suggestion),
            );
        }

        violations
    }
}
