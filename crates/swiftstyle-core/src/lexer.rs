//! Total lexer for Swift source text.
//!
//! Lexing never fails: byte sequences that fit no token class become
//! [`TokenKind::Unknown`] tokens, so a malformed file degrades to odd
//! tokens instead of aborting a batch run. Byte offsets are exact so the
//! fix applier can splice the original buffer.

/// Classification of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier, including backtick-quoted identifiers.
    Identifier,
    /// Reserved word (`class`, `func`, `private`, ...).
    Keyword,
    /// String literal, single-line or multiline.
    StringLiteral,
    /// Numeric literal.
    NumberLiteral,
    /// Operator or delimiter.
    Punct,
    /// Ordinary `//` or `/* */` comment.
    Comment,
    /// `///` or `/** */` documentation comment.
    DocComment,
    /// Line break.
    Newline,
    /// Byte sequence that fits no other class.
    Unknown,
    /// End of input.
    Eof,
}

/// A single position-tagged token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Byte length.
    pub len: usize,
}

impl Token {
    /// Returns true for tokens that carry no syntactic weight.
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Comment | TokenKind::DocComment | TokenKind::Newline
        )
    }
}

/// Swift reserved words recognized as [`TokenKind::Keyword`].
const KEYWORDS: &[&str] = &[
    "actor",
    "any",
    "as",
    "associatedtype",
    "async",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "continue",
    "convenience",
    "default",
    "defer",
    "deinit",
    "do",
    "else",
    "enum",
    "extension",
    "fallthrough",
    "false",
    "fileprivate",
    "final",
    "for",
    "func",
    "guard",
    "if",
    "import",
    "in",
    "indirect",
    "init",
    "inout",
    "internal",
    "is",
    "lazy",
    "let",
    "mutating",
    "nil",
    "nonmutating",
    "open",
    "override",
    "private",
    "protocol",
    "public",
    "repeat",
    "required",
    "rethrows",
    "return",
    "self",
    "Self",
    "some",
    "static",
    "struct",
    "subscript",
    "super",
    "switch",
    "throw",
    "throws",
    "true",
    "try",
    "typealias",
    "unowned",
    "var",
    "weak",
    "where",
    "while",
];

/// Multi-character operators, longest first so prefixes never shadow them.
const OPERATORS: &[&str] = &[
    "...", "..<", "===", "!==", "->", "==", "!=", "<=", ">=", "&&", "||", "+=", "-=", "*=", "/=",
    "??", "?.",
];

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

struct Scanner<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn byte_offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.src.len(), |&(off, _)| off)
    }

    fn advance(&mut self) -> Option<char> {
        let &(_, c) = self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.byte_offset()..].starts_with(pat)
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) {
        let end = self.byte_offset();
        self.tokens.push(Token {
            kind,
            text: self.src[start..end].to_string(),
            line,
            column,
            offset: start,
            len: end - start,
        });
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            let start = self.byte_offset();
            let (line, column) = (self.line, self.column);

            if c == '\n' {
                self.advance();
                self.push(TokenKind::Newline, start, line, column);
            } else if c == '\r' || c == ' ' || c == '\t' {
                self.advance();
            } else if self.starts_with("///") {
                self.consume_line();
                self.push(TokenKind::DocComment, start, line, column);
            } else if self.starts_with("//") {
                self.consume_line();
                self.push(TokenKind::Comment, start, line, column);
            } else if self.starts_with("/**") && !self.starts_with("/**/") {
                self.consume_block_comment();
                self.push(TokenKind::DocComment, start, line, column);
            } else if self.starts_with("/*") {
                self.consume_block_comment();
                self.push(TokenKind::Comment, start, line, column);
            } else if c == '"' {
                self.consume_string();
                self.push(TokenKind::StringLiteral, start, line, column);
            } else if c == '`' {
                self.consume_backtick_identifier();
                self.push(TokenKind::Identifier, start, line, column);
            } else if c.is_ascii_digit() {
                self.consume_number();
                self.push(TokenKind::NumberLiteral, start, line, column);
            } else if is_ident_start(c) {
                self.consume_while(is_ident_continue);
                let end = self.byte_offset();
                let kind = if KEYWORDS.contains(&&self.src[start..end]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                self.push(kind, start, line, column);
            } else if let Some(op) = OPERATORS.iter().find(|op| self.starts_with(op)) {
                for _ in 0..op.chars().count() {
                    self.advance();
                }
                self.push(TokenKind::Punct, start, line, column);
            } else if c.is_ascii_punctuation() {
                self.advance();
                self.push(TokenKind::Punct, start, line, column);
            } else {
                // Anything else (stray control bytes, emoji operators, ...)
                // becomes a single Unknown token.
                self.advance();
                self.push(TokenKind::Unknown, start, line, column);
            }
        }

        let offset = self.src.len();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            line: self.line,
            column: self.column,
            offset,
            len: 0,
        });
        self.tokens
    }

    fn consume_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn consume_while(&mut self, pred: fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Block comments nest in Swift. An unterminated comment runs to EOF.
    fn consume_block_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        let mut depth = 1_usize;
        while depth > 0 {
            if self.starts_with("/*") {
                self.advance();
                self.advance();
                depth += 1;
            } else if self.starts_with("*/") {
                self.advance();
                self.advance();
                depth -= 1;
            } else if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consumes a string literal: single-line, multiline (`"""`), escapes,
    /// and `\(...)` interpolation (tracked by paren depth). An unterminated
    /// single-line string runs to the end of the line.
    fn consume_string(&mut self) {
        let multiline = self.starts_with("\"\"\"");
        if multiline {
            self.advance();
            self.advance();
            self.advance();
        } else {
            self.advance();
        }

        loop {
            let Some(c) = self.peek() else { break };

            if c == '\\' {
                self.advance();
                if self.peek() == Some('(') {
                    self.advance();
                    let mut depth = 1_usize;
                    while depth > 0 {
                        match self.advance() {
                            Some('(') => depth += 1,
                            Some(')') => depth -= 1,
                            Some(_) => {}
                            None => return,
                        }
                    }
                } else {
                    self.advance();
                }
                continue;
            }

            if multiline {
                if self.starts_with("\"\"\"") {
                    self.advance();
                    self.advance();
                    self.advance();
                    return;
                }
                self.advance();
            } else {
                if c == '"' {
                    self.advance();
                    return;
                }
                if c == '\n' {
                    return; // unterminated; newline stays its own token
                }
                self.advance();
            }
        }
    }

    fn consume_backtick_identifier(&mut self) {
        self.advance(); // opening backtick
        while let Some(c) = self.peek() {
            if c == '`' {
                self.advance();
                return;
            }
            if c == '\n' {
                return;
            }
            self.advance();
        }
    }

    fn consume_number(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else if c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
                self.advance();
            } else if (c == '+' || c == '-')
                && matches!(self.prev_char(), Some('e' | 'E' | 'p' | 'P'))
            {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn prev_char(&self) -> Option<char> {
        self.chars.get(self.pos.wrapping_sub(1)).map(|&(_, c)| c)
    }
}

/// Tokenizes source text. Total: never fails on any input.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn classifies_declaration_header() {
        let tokens = tokenize("public class Foo {}");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["public", "class", "Foo", "{", "}", ""]);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].kind, TokenKind::Punct);
    }

    #[test]
    fn doc_comment_distinct_from_comment() {
        let tokens = tokenize("/// docs\n// note\n/** block docs */\n/* block */");
        let kinds: Vec<TokenKind> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Newline && t.kind != TokenKind::Eof)
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::DocComment,
                TokenKind::Comment,
                TokenKind::DocComment,
                TokenKind::Comment,
            ]
        );
    }

    #[test]
    fn byte_offsets_are_exact() {
        let src = "let x = 1\nlet y = 2";
        for token in tokenize(src) {
            if token.kind != TokenKind::Eof {
                assert_eq!(&src[token.offset..token.offset + token.len], token.text);
            }
        }
    }

    #[test]
    fn string_with_interpolation_is_one_token() {
        let tokens = tokenize(r#"let s = "count: \(items.count) done""#);
        let strings: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::StringLiteral)
            .collect();
        assert_eq!(strings.len(), 1);
        assert!(strings[0].text.contains("items.count"));
    }

    #[test]
    fn multiline_string() {
        let src = "let s = \"\"\"\nline \"quoted\"\n\"\"\"";
        let tokens = tokenize(src);
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::StringLiteral && t.text.contains("quoted")));
    }

    #[test]
    fn nested_block_comment() {
        let tokens = tokenize("/* outer /* inner */ still outer */ let");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert!(tokens[0].text.ends_with("outer */"));
        assert_eq!(tokens[1].text, "let");
    }

    #[test]
    fn inequality_is_single_operator() {
        let tokens = tokenize("a != b");
        assert_eq!(tokens[1].text, "!=");
        assert_eq!(tokens[1].kind, TokenKind::Punct);
    }

    #[test]
    fn force_unwrap_bang_is_lone_punct() {
        let tokens = tokenize("user!.name");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["user", "!", ".", "name", ""]);
    }

    #[test]
    fn total_over_garbage_bytes() {
        let tokens = tokenize("let \u{1}\u{2} = \u{7f}\u{80}");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Unknown));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let k = kinds("let s = \"oops\nlet t = 1");
        assert!(k.contains(&TokenKind::StringLiteral));
        assert!(k.contains(&TokenKind::Newline));
    }

    #[test]
    fn backtick_identifier() {
        let tokens = tokenize("let `class` = 1");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "`class`");
    }

    #[test]
    fn lines_and_columns_are_one_indexed() {
        let tokens = tokenize("let a\nlet b");
        let b = tokens
            .iter()
            .find(|t| t.text == "b")
            .map(|t| (t.line, t.column));
        assert_eq!(b, Some((2, 5)));
    }
}
