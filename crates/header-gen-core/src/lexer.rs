// crates/header-gen-core/src/lexer.rs
// ============================================================================
// Module: Header Lexer
// Description: Tokenizer for C++ header declarations.
// Purpose: Produce a positioned token stream and canonical token rendering.
// Dependencies: crate::error
// ============================================================================

//! ## Overview
//! The lexer turns header text into identifiers, literals, punctuation, and
//! whole-line preprocessor directives. Comments and whitespace are dropped.
//! [`render_tokens`] turns a token slice back into canonical text with
//! deterministic spacing, which is how the model stores types and aliases.

use crate::error::ParseError;

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric literal.
    Number,
    /// String literal including quotes.
    Str,
    /// Character literal including quotes.
    Char,
    /// Single punctuation character.
    Punct,
    /// `::`.
    Scope,
    /// `->`.
    Arrow,
    /// Whole preprocessor line starting with `#`.
    Directive,
    /// End-of-input marker.
    Eof,
}

/// Token with its source text and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    /// Token classification.
    pub(crate) kind: TokenKind,
    /// Source slice for the token.
    pub(crate) text: &'a str,
    /// 1-based line.
    pub(crate) line: usize,
    /// 1-based byte column.
    pub(crate) column: usize,
}

impl Token<'_> {
    /// Returns true for the punctuation token `value`.
    pub(crate) fn is_punct(&self, value: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == value
    }

    /// Returns true for the identifier or keyword `value`.
    pub(crate) fn is_word(&self, value: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == value
    }

    /// Returns true for identifiers and literals.
    const fn is_wordlike(&self) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Number | TokenKind::Str | TokenKind::Char)
    }

    /// Formats the token for diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => self.text.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer for header text.
pub(crate) struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
    /// Current 1-based line.
    line: usize,
    /// Byte offset where the current line starts.
    line_start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub(crate) const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Lexes the input into a token sequence terminated by [`TokenKind::Eof`].
    pub(crate) fn lex(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while self.offset < bytes.len() {
            let ch = bytes[self.offset];
            match ch {
                b'\n' => self.newline(),
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.offset += 1,
                b'/' if self.peek(bytes, 1) == Some(b'/') => self.skip_line_comment(bytes),
                b'/' if self.peek(bytes, 1) == Some(b'*') => self.skip_block_comment(bytes)?,
                b'#' => tokens.push(self.directive(bytes)),
                b'"' => tokens.push(self.quoted(bytes, b'"', TokenKind::Str)?),
                b'\'' => tokens.push(self.quoted(bytes, b'\'', TokenKind::Char)?),
                b':' if self.peek(bytes, 1) == Some(b':') => {
                    tokens.push(self.fixed(TokenKind::Scope, 2));
                }
                b'-' if self.peek(bytes, 1) == Some(b'>') => {
                    tokens.push(self.fixed(TokenKind::Arrow, 2));
                }
                b'0' ..= b'9' => tokens.push(self.number(bytes)),
                b'.' if self.peek(bytes, 1).is_some_and(|b| b.is_ascii_digit()) => {
                    tokens.push(self.number(bytes));
                }
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    let start = self.offset;
                    let column = self.column();
                    self.consume_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'_');
                    tokens.push(Token {
                        kind: TokenKind::Ident,
                        text: &self.input[start .. self.offset],
                        line: self.line,
                        column,
                    });
                }
                b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'<' | b'>' | b',' | b';' | b'='
                | b'*' | b'&' | b':' | b'~' | b'!' | b'+' | b'-' | b'/' | b'%' | b'^' | b'|'
                | b'?' | b'.' => tokens.push(self.fixed(TokenKind::Punct, 1)),
                _ => {
                    let found = self.input[self.offset ..].chars().next().unwrap_or('\u{fffd}');
                    return Err(ParseError::UnexpectedCharacter {
                        found,
                        line: self.line,
                        column: self.column(),
                    });
                }
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            text: "",
            line: self.line,
            column: self.column(),
        });
        Ok(tokens)
    }

    /// Returns the 1-based column of the current offset.
    const fn column(&self) -> usize {
        self.offset - self.line_start + 1
    }

    /// Returns the byte `distance` positions ahead without advancing.
    fn peek(&self, bytes: &[u8], distance: usize) -> Option<u8> {
        bytes.get(self.offset + distance).copied()
    }

    /// Consumes a newline and starts a new line.
    const fn newline(&mut self) {
        self.offset += 1;
        self.line += 1;
        self.line_start = self.offset;
    }

    /// Builds a token of `len` bytes at the current offset and advances.
    fn fixed(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let token = Token {
            kind,
            text: &self.input[self.offset .. self.offset + len],
            line: self.line,
            column: self.column(),
        };
        self.offset += len;
        token
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Skips a `//` comment up to (not including) the newline.
    fn skip_line_comment(&mut self, bytes: &[u8]) {
        self.consume_while(bytes, |b| b != b'\n');
    }

    /// Skips a `/* */` comment, tracking newlines.
    fn skip_block_comment(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        let line = self.line;
        let column = self.column();
        self.offset += 2;
        loop {
            match bytes.get(self.offset) {
                None => {
                    return Err(ParseError::UnterminatedComment {
                        line,
                        column,
                    });
                }
                Some(b'*') if self.peek(bytes, 1) == Some(b'/') => {
                    self.offset += 2;
                    return Ok(());
                }
                Some(b'\n') => self.newline(),
                Some(_) => self.offset += 1,
            }
        }
    }

    /// Lexes a preprocessor line, honoring backslash continuations.
    ///
    /// The token text stops before a trailing `//` comment; a trailing `/*`
    /// comment is left for the main loop.
    fn directive(&mut self, bytes: &[u8]) -> Token<'a> {
        let start = self.offset;
        let line = self.line;
        let column = self.column();
        let mut end = None;
        while let Some(&b) = bytes.get(self.offset) {
            match b {
                b'\\' if self.peek(bytes, 1) == Some(b'\n') => {
                    self.offset += 1;
                    self.newline();
                }
                b'\\' if self.peek(bytes, 1) == Some(b'\r') && self.peek(bytes, 2) == Some(b'\n') => {
                    self.offset += 2;
                    self.newline();
                }
                b'\n' => break,
                b'/' if self.peek(bytes, 1) == Some(b'/') => {
                    end.get_or_insert(self.offset);
                    self.skip_line_comment(bytes);
                }
                b'/' if self.peek(bytes, 1) == Some(b'*') => break,
                _ => self.offset += 1,
            }
        }
        let end = end.unwrap_or(self.offset);
        Token {
            kind: TokenKind::Directive,
            text: self.input[start .. end].trim_end(),
            line,
            column,
        }
    }

    /// Lexes a string or character literal.
    fn quoted(&mut self, bytes: &[u8], quote: u8, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        let start = self.offset;
        let line = self.line;
        let column = self.column();
        self.offset += 1;
        loop {
            match bytes.get(self.offset) {
                None | Some(b'\n') => {
                    return Err(ParseError::UnterminatedLiteral {
                        line,
                        column,
                    });
                }
                Some(b'\\') => match (self.peek(bytes, 1), self.peek(bytes, 2)) {
                    (Some(b'\n'), _) => {
                        self.offset += 1;
                        self.newline();
                    }
                    (Some(b'\r'), Some(b'\n')) => {
                        self.offset += 2;
                        self.newline();
                    }
                    _ => self.offset += 2,
                },
                Some(&b) if b == quote => {
                    self.offset += 1;
                    break;
                }
                Some(_) => self.offset += 1,
            }
        }
        let end = self.offset.min(bytes.len());
        Ok(Token {
            kind,
            text: &self.input[start .. end],
            line,
            column,
        })
    }

    /// Lexes a numeric literal, including suffixes and exponent signs.
    fn number(&mut self, bytes: &[u8]) -> Token<'a> {
        let start = self.offset;
        let column = self.column();
        while let Some(&b) = bytes.get(self.offset) {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'\'' {
                self.offset += 1;
            } else if (b == b'+' || b == b'-')
                && matches!(bytes.get(self.offset - 1), Some(b'e' | b'E' | b'p' | b'P'))
            {
                self.offset += 1;
            } else {
                break;
            }
        }
        Token {
            kind: TokenKind::Number,
            text: &self.input[start .. self.offset],
            line: self.line,
            column,
        }
    }
}

// ============================================================================
// SECTION: Canonical Rendering
// ============================================================================

/// Renders tokens as canonical text with deterministic spacing.
///
/// Words are separated by one space; `::`, brackets, template angles, and
/// `*`/`&` attach to their neighbors (`const abc::def::foo&`,
/// `std::pair<double, int>`).
pub(crate) fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token<'_>> = None;
    for token in tokens {
        if let Some(prev) = previous
            && needs_space(prev, token)
        {
            out.push(' ');
        }
        out.push_str(token.text);
        previous = Some(token);
    }
    out
}

/// Returns true when a space separates `prev` and `next` in canonical text.
fn needs_space(prev: &Token<'_>, next: &Token<'_>) -> bool {
    if prev.kind == TokenKind::Scope || next.kind == TokenKind::Scope {
        return false;
    }
    if next.kind == TokenKind::Punct {
        match next.text {
            "," | ";" | ")" | "]" | ">" | "*" | "&" | "(" | "[" | "." | "<" | "}" => return false,
            "{" if prev.is_wordlike() => return false,
            _ => {}
        }
    }
    !(prev.kind == TokenKind::Punct
        && matches!(prev.text, "(" | "[" | "<" | "~" | "!" | "-" | "+" | "." | "{"))
}

