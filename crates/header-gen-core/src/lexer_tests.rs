// crates/header-gen-core/src/lexer_tests.rs
// ============================================================================
// Module: Header Lexer Tests
// Description: Unit tests for tokenization and canonical token rendering.
// Purpose: Pin token positions, directive handling, and spacing rules.
// Dependencies: header-gen-core lexer
// ============================================================================

//! ## Overview
//! Exercises the crate-private lexer directly: comment skipping, directive
//! lines with continuations, literal errors, and the spacing rules used for
//! canonical type text.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::lexer::Token;
use crate::lexer::TokenKind;
use crate::lexer::render_tokens;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn lex(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).lex().expect("lex")
}

fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
    tokens.iter().filter(|token| token.kind != TokenKind::Eof).map(|token| token.text).collect()
}

fn canonical(input: &str) -> String {
    let tokens = lex(input);
    let body: Vec<Token<'_>> =
        tokens.into_iter().filter(|token| token.kind != TokenKind::Eof).collect();
    render_tokens(&body)
}

// ============================================================================
// SECTION: Tokenization
// ============================================================================

#[test]
fn skips_comments_and_tracks_positions() {
    let tokens = lex("// leading\n/* block\n comment */ int\n  value;");
    assert_eq!(texts(&tokens), vec!["int", "value", ";"]);
    assert_eq!((tokens[0].line, tokens[0].column), (3, 13));
    assert_eq!((tokens[1].line, tokens[1].column), (4, 3));
    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
}

#[test]
fn scope_and_arrow_are_single_tokens() {
    let tokens = lex("a::b->c");
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Scope,
            TokenKind::Ident,
            TokenKind::Arrow,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn directive_spans_continuations_and_drops_line_comment() {
    let tokens = lex("#define LONG(a) \\\n  (a + 1) // note\nint x;");
    assert_eq!(tokens[0].kind, TokenKind::Directive);
    assert_eq!(tokens[0].text, "#define LONG(a) \\\n  (a + 1)");
    assert_eq!(tokens[1].text, "int");
    assert_eq!(tokens[1].line, 3);
}

#[test]
fn literals_keep_their_quotes() {
    let tokens = lex(r#"f("a\"b", 'c', 1.5e-3f);"#);
    assert_eq!(texts(&tokens), vec!["f", "(", "\"a\\\"b\"", ",", "'c'", ",", "1.5e-3f", ")", ";"]);
    assert_eq!(tokens[2].kind, TokenKind::Str);
    assert_eq!(tokens[4].kind, TokenKind::Char);
    assert_eq!(tokens[6].kind, TokenKind::Number);
}

#[test]
fn escaped_newline_in_literal_advances_line() {
    let tokens = lex("const char* s = \"ab\\\ncd\";\nint next;");
    let literal = tokens.iter().find(|token| token.kind == TokenKind::Str).unwrap();
    assert_eq!((literal.line, literal.column), (1, 17));
    let next = tokens.iter().find(|token| token.text == "next").unwrap();
    assert_eq!((next.line, next.column), (3, 5));

    let tokens = lex("\"x\\\r\ny\" z");
    let z = tokens.iter().find(|token| token.text == "z").unwrap();
    assert_eq!((z.line, z.column), (2, 4));
}

// ============================================================================
// SECTION: Errors
// ============================================================================

#[test]
fn unterminated_block_comment_reports_start() {
    let err = Lexer::new("int a;\n  /* open").lex().unwrap_err();
    assert_eq!(
        err,
        ParseError::UnterminatedComment {
            line: 2,
            column: 3,
        }
    );
}

#[test]
fn unterminated_string_reports_start() {
    let err = Lexer::new("const char* s = \"abc\n;").lex().unwrap_err();
    assert_eq!(
        err,
        ParseError::UnterminatedLiteral {
            line: 1,
            column: 17,
        }
    );
}

#[test]
fn unexpected_character_is_rejected() {
    let err = Lexer::new("int a @ b;").lex().unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedCharacter {
            found: '@',
            line: 1,
            column: 7,
        }
    );
}

// ============================================================================
// SECTION: Canonical Rendering
// ============================================================================

#[test]
fn canonical_text_attaches_pointers_and_scopes() {
    assert_eq!(canonical("const  abc :: def :: foo &"), "const abc::def::foo&");
    assert_eq!(canonical("date *"), "date*");
    assert_eq!(canonical("std::pair< double,int >"), "std::pair<double, int>");
}

#[test]
fn canonical_text_for_aliases() {
    assert_eq!(
        canonical("using MyFancyFn = std::function<bool(int*)>;"),
        "using MyFancyFn = std::function<bool(int*)>;"
    );
    assert_eq!(canonical("friend   class MyGoodFriend ;"), "friend class MyGoodFriend;");
    assert_eq!(canonical("{ 1, 2 }"), "{1, 2}");
    assert_eq!(canonical("~ Widget"), "~Widget");
}
