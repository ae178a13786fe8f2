//! Structural model derived from the token stream.
//!
//! The builder walks the flat token stream once and produces the summary
//! every rule reads: imports partitioned into ordering groups, ordered
//! declarations with access level and scope parentage, and per-line
//! metrics. The model is append-only during the walk and frozen after;
//! rules never mutate it.

use crate::lexer::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Explicit access-level keyword on a declaration.
///
/// `Unspecified` means no keyword was written. It is preserved through
/// the whole pipeline and never collapsed to `Internal`; the
/// explicit-access-level rule depends on the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// `private`
    Private,
    /// `fileprivate`
    Fileprivate,
    /// `internal`
    Internal,
    /// `public`
    Public,
    /// `open`
    Open,
    /// No access keyword written.
    Unspecified,
}

impl AccessLevel {
    /// Returns true for `private` and `fileprivate`.
    #[must_use]
    pub fn is_restricted(self) -> bool {
        matches!(self, Self::Private | Self::Fileprivate)
    }
}

/// Kind of a declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    /// `class` declaration.
    Class,
    /// `struct` declaration.
    Struct,
    /// `enum` declaration.
    Enum,
    /// `protocol` declaration.
    Protocol,
    /// `extension` declaration.
    Extension,
    /// `actor` declaration.
    Actor,
    /// `typealias` or `associatedtype`.
    TypeAlias,
    /// `func` or `deinit`.
    Function,
    /// `init`.
    Initializer,
    /// `var` or `let` binding at type or top-level scope, or a local.
    Property,
    /// `case` inside an enum body.
    EnumCase,
    /// `subscript`.
    Subscript,
}

impl DeclKind {
    /// Returns true for kinds that introduce a named type.
    #[must_use]
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Struct | Self::Enum | Self::Protocol | Self::Actor
        )
    }
}

/// Import ordering group, determined by syntactic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportGroup {
    /// `import Module`
    Module,
    /// `import class Module.Symbol` and other declaration imports.
    Declaration,
    /// `@testable import Module`
    Testable,
}

/// One import statement, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    /// Dotted module (or module.symbol) path.
    pub module: String,
    /// Ordering group.
    pub group: ImportGroup,
    /// Line number (1-indexed).
    pub line: usize,
    /// Byte offset of the statement start.
    pub offset: usize,
    /// Byte length through the last path segment.
    pub len: usize,
}

/// One declared symbol. Created during the build walk, frozen after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Symbol kind.
    pub kind: DeclKind,
    /// Declared name. Operators keep their punctuation text.
    pub name: String,
    /// Explicit access level, or `Unspecified` when no keyword was written.
    pub access: AccessLevel,
    /// Attribute names preceding the declaration (`IBOutlet`, `objc`, ...).
    pub attributes: Vec<String>,
    /// Whether a contiguous doc-comment block immediately precedes this
    /// declaration (not separated by blank lines or other declarations).
    pub has_doc_comment: bool,
    /// Line of the declaration keyword (1-indexed).
    pub line: usize,
    /// Column of the declaration keyword (1-indexed).
    pub column: usize,
    /// Byte offset of the declaration keyword.
    pub offset: usize,
    /// Byte length of the whole declaration including its body.
    pub len: usize,
    /// Byte offset of the name token.
    pub name_offset: usize,
    /// Byte length of the name token.
    pub name_len: usize,
    /// Line of the name token.
    pub name_line: usize,
    /// Column of the name token.
    pub name_column: usize,
    /// Number of enclosing declaration scopes.
    pub nesting_depth: usize,
    /// Index of the enclosing declaration in the model, if any.
    pub parent_index: Option<usize>,
    /// Kind of the enclosing declaration.
    pub parent_kind: Option<DeclKind>,
    /// Access level of the enclosing declaration.
    pub parent_access: Option<AccessLevel>,
}

/// Per-line metrics recorded by the builder so rules never re-scan text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInfo {
    /// Line number (1-indexed).
    pub number: usize,
    /// Column of the final non-whitespace character (0 for blank lines).
    pub last_column: usize,
    /// Byte offset of the line start.
    pub offset: usize,
    /// Byte length of the line excluding the newline.
    pub len: usize,
}

/// The frozen structural summary of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralModel {
    /// Imports in source order.
    pub imports: Vec<ImportEntry>,
    /// Declarations in the order encountered.
    pub declarations: Vec<Declaration>,
    /// Per-line metrics.
    pub lines: Vec<LineInfo>,
}

impl StructuralModel {
    /// Top-level declarations (nesting depth zero).
    pub fn top_level(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.nesting_depth == 0)
    }
}

/// Structural build failure. The only unrecoverable condition is scope
/// nesting that cannot be disambiguated; everything else degrades.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A closing delimiter had no matching opener, or an opener was never
    /// closed.
    #[error("unbalanced `{delimiter}` at {line}:{column}")]
    UnbalancedDelimiters {
        /// Offending delimiter character.
        delimiter: char,
        /// Line of the offending delimiter (1-indexed).
        line: usize,
        /// Column of the offending delimiter (1-indexed).
        column: usize,
    },
}

/// Declaration-introducing keywords that may follow `import`.
const DECL_IMPORT_KINDS: &[&str] = &[
    "class",
    "struct",
    "enum",
    "protocol",
    "func",
    "var",
    "let",
    "typealias",
];

/// Modifier keywords skipped when scanning a declaration header.
const MODIFIERS: &[&str] = &[
    "static",
    "final",
    "override",
    "lazy",
    "weak",
    "unowned",
    "required",
    "convenience",
    "mutating",
    "nonmutating",
    "indirect",
    "async",
    "throws",
    "rethrows",
];

#[derive(Debug)]
struct OpenDelim {
    ch: char,
    line: usize,
    column: usize,
    /// Declaration owning this brace scope, for `{` only.
    decl_index: Option<usize>,
}

struct Builder<'a> {
    tokens: &'a [Token],
    i: usize,
    decls: Vec<Declaration>,
    imports: Vec<ImportEntry>,
    delims: Vec<OpenDelim>,
    pending_attrs: Vec<String>,
    pending_access: Option<AccessLevel>,
    /// Declaration awaiting its `{` body.
    pending_owner: Option<usize>,
    /// Declaration whose length ends at the next statement boundary.
    pending_statement: Option<usize>,
    /// End line of the doc-comment block available for attachment.
    doc_pending: Option<usize>,
    prev_sig: Option<(TokenKind, String)>,
}

impl<'a> Builder<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            i: 0,
            decls: Vec::new(),
            imports: Vec::new(),
            delims: Vec::new(),
            pending_attrs: Vec::new(),
            pending_access: None,
            pending_owner: None,
            pending_statement: None,
            doc_pending: None,
            prev_sig: None,
        }
    }

    fn peek_sig(&self, from: usize) -> Option<&Token> {
        self.tokens[from..]
            .iter()
            .find(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
    }

    fn access_from_keyword(text: &str) -> Option<AccessLevel> {
        match text {
            "private" => Some(AccessLevel::Private),
            "fileprivate" => Some(AccessLevel::Fileprivate),
            "internal" => Some(AccessLevel::Internal),
            "public" => Some(AccessLevel::Public),
            "open" => Some(AccessLevel::Open),
            _ => None,
        }
    }

    fn innermost_parent(&self) -> Option<usize> {
        self.delims
            .iter()
            .rev()
            .find_map(|d| (d.ch == '{').then_some(d.decl_index).flatten())
    }

    fn nesting_depth(&self) -> usize {
        self.delims
            .iter()
            .filter(|d| d.ch == '{' && d.decl_index.is_some())
            .count()
    }

    fn finalize_statement(&mut self, end_offset: usize) {
        if let Some(idx) = self.pending_statement.take() {
            let decl = &mut self.decls[idx];
            decl.len = end_offset.saturating_sub(decl.offset);
        }
        self.pending_owner = None;
    }

    fn emit(&mut self, kind: DeclKind, keyword: &Token, name: &Token) -> usize {
        let parent_index = self.innermost_parent();
        let (parent_kind, parent_access) = parent_index
            .map(|pi| (Some(self.decls[pi].kind), Some(self.decls[pi].access)))
            .unwrap_or((None, None));

        let decl = Declaration {
            kind,
            name: name.text.clone(),
            access: self.pending_access.take().unwrap_or(AccessLevel::Unspecified),
            attributes: std::mem::take(&mut self.pending_attrs),
            has_doc_comment: self.doc_pending.take().is_some(),
            line: keyword.line,
            column: keyword.column,
            offset: keyword.offset,
            len: name.offset + name.len - keyword.offset,
            name_offset: name.offset,
            name_len: name.len,
            name_line: name.line,
            name_column: name.column,
            nesting_depth: self.nesting_depth(),
            parent_index,
            parent_kind,
            parent_access,
        };
        self.decls.push(decl);
        self.decls.len() - 1
    }

    /// Parses `import Foo.Bar` with optional declaration-kind keyword and
    /// `@testable` attribute. Consumes through the last path segment.
    fn parse_import(&mut self, keyword_index: usize) {
        let keyword = &self.tokens[keyword_index];
        let testable = self
            .pending_attrs
            .iter()
            .any(|a| a.eq_ignore_ascii_case("testable"));
        self.pending_attrs.clear();
        self.pending_access = None;

        let mut j = keyword_index + 1;
        let mut group = if testable {
            ImportGroup::Testable
        } else {
            ImportGroup::Module
        };

        // Skip a declaration-kind keyword: `import class UIKit.UIView`.
        if let Some(t) = self.tokens.get(j) {
            if t.kind == TokenKind::Keyword && DECL_IMPORT_KINDS.contains(&t.text.as_str()) {
                if !testable {
                    group = ImportGroup::Declaration;
                }
                j += 1;
            }
        }

        let mut module = String::new();
        let mut end = keyword.offset + keyword.len;
        while let Some(t) = self.tokens.get(j) {
            match t.kind {
                TokenKind::Identifier | TokenKind::Keyword => {
                    module.push_str(&t.text);
                    end = t.offset + t.len;
                    j += 1;
                    if self.tokens.get(j).is_some_and(|n| n.text == ".") {
                        module.push('.');
                        j += 1;
                        continue;
                    }
                    break;
                }
                _ => break,
            }
        }

        if !module.is_empty() {
            self.imports.push(ImportEntry {
                module,
                group,
                line: keyword.line,
                offset: keyword.offset,
                len: end - keyword.offset,
            });
        }
        self.i = j;
    }

    /// Consumes a parenthesized group starting at `self.i` (which must be
    /// at `(`), used for attribute arguments and setter access scopes.
    fn skip_parens(&mut self) {
        debug_assert_eq!(self.tokens[self.i].text, "(");
        let mut depth = 0_usize;
        while let Some(t) = self.tokens.get(self.i) {
            match t.text.as_str() {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        self.i += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.i += 1;
        }
    }

    /// Emits one declaration per comma-separated name after a `var`,
    /// `let`, or `case` keyword. Leaves `self.i` after the last name.
    fn emit_binding_list(&mut self, kind: DeclKind, keyword_index: usize) {
        let keyword = self.tokens[keyword_index].clone();
        let mut j = keyword_index + 1;
        // Shared header state applies to every name in the list.
        let access = self.pending_access;
        let attrs = self.pending_attrs.clone();
        let doc = self.doc_pending;

        let mut first = true;
        loop {
            let Some(name) = self.peek_sig(j) else { break };
            if name.kind != TokenKind::Identifier {
                break;
            }
            let name = name.clone();
            while self.tokens[j].offset != name.offset {
                j += 1;
            }

            if !first {
                self.pending_access = access;
                self.pending_attrs = attrs.clone();
                self.doc_pending = doc;
            }
            let idx = self.emit(kind, &keyword, &name);
            if first {
                self.pending_statement = Some(idx);
                self.pending_owner = Some(idx);
                first = false;
            }
            j += 1;

            // `case a(Int)` associated values sit between name and comma.
            if self.tokens.get(j).is_some_and(|t| t.text == "(") {
                let save = self.i;
                self.i = j;
                self.skip_parens();
                j = self.i;
                self.i = save;
            }

            match self.peek_sig(j) {
                Some(t) if t.text == "," => {
                    let comma_offset = t.offset;
                    while self.tokens[j].offset != comma_offset {
                        j += 1;
                    }
                    j += 1;
                }
                _ => break,
            }
        }
        self.i = j;
    }

    fn build(mut self) -> Result<Vec<Declaration>, BuildError> {
        while self.i < self.tokens.len() {
            let token = self.tokens[self.i].clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.finalize_statement(token.offset);
                    // A blank line breaks doc attachment and header state.
                    if self.prev_sig_is_newline() {
                        self.doc_pending = None;
                        self.pending_attrs.clear();
                        self.pending_access = None;
                    }
                    self.i += 1;
                    continue;
                }
                TokenKind::Comment => {
                    self.i += 1;
                    continue;
                }
                TokenKind::DocComment => {
                    self.doc_pending = Some(token.line);
                    self.i += 1;
                    continue;
                }
                TokenKind::Keyword => self.handle_keyword(&token)?,
                TokenKind::Punct => self.handle_punct(&token)?,
                TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::NumberLiteral
                | TokenKind::Unknown => {
                    self.i += 1;
                }
            }
            self.prev_sig = Some((token.kind, token.text));
        }

        self.finalize_statement(
            self.tokens
                .last()
                .map_or(0, |t| t.offset),
        );

        if let Some(open) = self.delims.last() {
            return Err(BuildError::UnbalancedDelimiters {
                delimiter: open.ch,
                line: open.line,
                column: open.column,
            });
        }
        Ok(self.decls)
    }

    /// True when the previously processed token (ignoring comments) was a
    /// newline, meaning the current newline forms a blank line.
    fn prev_sig_is_newline(&self) -> bool {
        // prev_sig excludes trivia, so track blank lines from raw history.
        let mut j = self.i;
        while j > 0 {
            j -= 1;
            match self.tokens[j].kind {
                TokenKind::Comment => continue,
                TokenKind::Newline => return true,
                _ => return false,
            }
        }
        true
    }

    fn handle_keyword(&mut self, token: &Token) -> Result<(), BuildError> {
        let text = token.text.as_str();

        if text == "import" {
            self.parse_import(self.i);
            return Ok(());
        }

        if let Some(access) = Self::access_from_keyword(text) {
            self.i += 1;
            // `private(set)` scopes the setter only; it does not declare
            // the access level of the symbol itself.
            if self.tokens.get(self.i).is_some_and(|t| t.text == "(") {
                self.skip_parens();
            } else {
                self.pending_access = Some(access);
            }
            return Ok(());
        }

        if MODIFIERS.contains(&text) {
            self.i += 1;
            return Ok(());
        }

        match text {
            "class" | "struct" | "enum" | "protocol" | "extension" | "actor" => {
                // `class func` / `class var` are member modifiers.
                if text == "class"
                    && self
                        .peek_sig(self.i + 1)
                        .is_some_and(|t| matches!(t.text.as_str(), "func" | "var" | "let"))
                {
                    self.i += 1;
                    return Ok(());
                }
                let kind = match text {
                    "class" => DeclKind::Class,
                    "struct" => DeclKind::Struct,
                    "enum" => DeclKind::Enum,
                    "protocol" => DeclKind::Protocol,
                    "actor" => DeclKind::Actor,
                    _ => DeclKind::Extension,
                };
                if let Some(name) = self.peek_sig(self.i + 1).cloned() {
                    if name.kind == TokenKind::Identifier {
                        let idx = self.emit(kind, token, &name);
                        self.pending_owner = Some(idx);
                        self.pending_statement = Some(idx);
                        while self.tokens[self.i].offset != name.offset {
                            self.i += 1;
                        }
                    }
                }
                self.i += 1;
            }
            "typealias" | "associatedtype" => {
                if let Some(name) = self.peek_sig(self.i + 1).cloned() {
                    if name.kind == TokenKind::Identifier {
                        let idx = self.emit(DeclKind::TypeAlias, token, &name);
                        self.pending_statement = Some(idx);
                        while self.tokens[self.i].offset != name.offset {
                            self.i += 1;
                        }
                    }
                }
                self.i += 1;
            }
            "func" => {
                if let Some(name) = self.peek_sig(self.i + 1).cloned() {
                    let idx = self.emit(DeclKind::Function, token, &name);
                    self.pending_owner = Some(idx);
                    self.pending_statement = Some(idx);
                    while self.tokens[self.i].offset != name.offset {
                        self.i += 1;
                    }
                }
                self.i += 1;
            }
            "init" => {
                let idx = self.emit(DeclKind::Initializer, token, token);
                self.pending_owner = Some(idx);
                self.pending_statement = Some(idx);
                self.i += 1;
            }
            "deinit" => {
                let idx = self.emit(DeclKind::Function, token, token);
                self.pending_owner = Some(idx);
                self.pending_statement = Some(idx);
                self.i += 1;
            }
            "subscript" => {
                let idx = self.emit(DeclKind::Subscript, token, token);
                self.pending_owner = Some(idx);
                self.pending_statement = Some(idx);
                self.i += 1;
            }
            "var" | "let" => {
                // `if let`, `guard var`, `for case let`, and binding lists
                // in conditions are not declarations.
                let in_condition = matches!(
                    self.prev_sig.as_ref().map(|(_, t)| t.as_str()),
                    Some("if" | "guard" | "while" | "for" | "case" | "," | "(")
                );
                if in_condition {
                    self.i += 1;
                } else {
                    self.emit_binding_list(DeclKind::Property, self.i);
                }
            }
            "case" => {
                let in_enum = self
                    .innermost_parent()
                    .is_some_and(|pi| self.decls[pi].kind == DeclKind::Enum);
                if in_enum {
                    self.emit_binding_list(DeclKind::EnumCase, self.i);
                } else {
                    self.doc_pending = None;
                    self.i += 1;
                }
            }
            _ => {
                self.i += 1;
            }
        }
        Ok(())
    }

    fn handle_punct(&mut self, token: &Token) -> Result<(), BuildError> {
        match token.text.as_str() {
            "@" => {
                if let Some(name) = self.tokens.get(self.i + 1) {
                    if matches!(name.kind, TokenKind::Identifier | TokenKind::Keyword) {
                        self.pending_attrs.push(name.text.clone());
                        self.i += 2;
                        if self.tokens.get(self.i).is_some_and(|t| t.text == "(") {
                            self.skip_parens();
                        }
                        return Ok(());
                    }
                }
                self.i += 1;
            }
            "{" => {
                let owner = self.pending_owner.take();
                if owner.is_some() {
                    self.pending_statement = None;
                }
                self.delims.push(OpenDelim {
                    ch: '{',
                    line: token.line,
                    column: token.column,
                    decl_index: owner,
                });
                self.i += 1;
            }
            "}" => {
                match self.delims.pop() {
                    Some(open) if open.ch == '{' => {
                        if let Some(idx) = open.decl_index {
                            let decl = &mut self.decls[idx];
                            decl.len = token.offset + token.len - decl.offset;
                        }
                    }
                    _ => {
                        return Err(BuildError::UnbalancedDelimiters {
                            delimiter: '}',
                            line: token.line,
                            column: token.column,
                        });
                    }
                }
                self.doc_pending = None;
                self.i += 1;
            }
            "(" | "[" => {
                self.delims.push(OpenDelim {
                    ch: token.text.chars().next().unwrap_or('('),
                    line: token.line,
                    column: token.column,
                    decl_index: None,
                });
                self.i += 1;
            }
            ")" | "]" => {
                let expected = if token.text == ")" { '(' } else { '[' };
                match self.delims.pop() {
                    Some(open) if open.ch == expected => {}
                    _ => {
                        return Err(BuildError::UnbalancedDelimiters {
                            delimiter: token.text.chars().next().unwrap_or(')'),
                            line: token.line,
                            column: token.column,
                        });
                    }
                }
                self.i += 1;
            }
            ";" => {
                self.finalize_statement(token.offset);
                self.i += 1;
            }
            _ => {
                self.i += 1;
            }
        }
        Ok(())
    }
}

fn line_metrics(source: &str) -> Vec<LineInfo> {
    let mut lines = Vec::new();
    let mut offset = 0_usize;
    for (idx, raw) in source.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        lines.push(LineInfo {
            number: idx + 1,
            last_column: line.trim_end().chars().count(),
            offset,
            len: line.len(),
        });
        offset += raw.len() + 1;
    }
    if source.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Builds the structural model for one file.
///
/// # Errors
///
/// Returns [`BuildError::UnbalancedDelimiters`] when scope nesting is
/// ambiguous. The caller degrades this to a single diagnostic violation;
/// it never aborts a batch run.
pub fn build(source: &str, tokens: &[Token]) -> Result<StructuralModel, BuildError> {
    let declarations = Builder::new(tokens).build()?;
    Ok(StructuralModel {
        imports: Builder::new(tokens).collect_imports(),
        declarations,
        lines: line_metrics(source),
    })
}

impl Builder<'_> {
    /// Second pass collecting only imports, on a fresh cursor so the
    /// declaration walk never has to carry import state. Runs only after
    /// the declaration pass succeeded.
    fn collect_imports(mut self) -> Vec<ImportEntry> {
        while self.i < self.tokens.len() {
            let token = self.tokens[self.i].clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Keyword if token.text == "import" => {
                    self.parse_import(self.i);
                }
                TokenKind::Punct if token.text == "@" => {
                    if let Some(name) = self.tokens.get(self.i + 1) {
                        if matches!(name.kind, TokenKind::Identifier | TokenKind::Keyword) {
                            self.pending_attrs.push(name.text.clone());
                            self.i += 2;
                            continue;
                        }
                    }
                    self.i += 1;
                }
                TokenKind::Newline | TokenKind::Comment | TokenKind::DocComment => {
                    self.i += 1;
                }
                _ => {
                    self.pending_attrs.clear();
                    self.i += 1;
                }
            }
        }
        self.imports
    }
}
