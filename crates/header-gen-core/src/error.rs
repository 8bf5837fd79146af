// crates/header-gen-core/src/error.rs
// ============================================================================
// Module: Header Errors
// Description: Structured parse failures and file-level header errors.
// Purpose: Report the exact source position of lexing and parsing failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ParseError`] describes why a header could not be read, with 1-based
//! line and byte column positions. [`HeaderError`] wraps it together with the
//! file-level failures (I/O, size limits) of [`crate::parse_header_file`].

use thiserror::Error;

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Errors raised while lexing or parsing header text.
///
/// # Invariants
/// - `line` and `column` are 1-based; `column` counts bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input exceeded the configured size limit.
    #[error("input exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Character that cannot start any token.
    #[error("unexpected character `{found}` at {line}:{column}")]
    UnexpectedCharacter {
        /// Offending character.
        found: char,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// `/*` without a matching `*/`.
    #[error("unterminated block comment starting at {line}:{column}")]
    UnterminatedComment {
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// String or character literal without a closing quote.
    #[error("unterminated literal starting at {line}:{column}")]
    UnterminatedLiteral {
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Token that does not fit the declaration being read.
    #[error("unexpected token `{found}`, expected {expected} at {line}:{column}")]
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Input ended inside a declaration.
    #[error("unexpected end of input, expected {expected} at {line}:{column}")]
    UnexpectedEof {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Valid C++ that the declaration reader does not handle.
    #[error("unsupported construct: {construct} at {line}:{column}")]
    Unsupported {
        /// Construct description.
        construct: &'static str,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Class definition inside another class.
    #[error("nested class `{name}` is not allowed at {line}:{column}")]
    NestedClass {
        /// Nested class name.
        name: String,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Second class definition in one header.
    #[error("multiple class definitions are not allowed: `{name}` at {line}:{column}")]
    MultipleClasses {
        /// Name of the second class.
        name: String,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Function without a return type that is not a constructor or destructor.
    #[error("function `{name}` has no return type at {line}:{column}")]
    MissingReturnType {
        /// Function name.
        name: String,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// `#elif`, `#else`, or `#endif` without an open conditional.
    #[error("`{directive}` has no matching `#if` at {line}:{column}")]
    UnbalancedConditional {
        /// Directive text.
        directive: String,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
    /// Conditional still open at end of input.
    #[error("`{directive}` is never closed at {line}:{column}")]
    UnterminatedConditional {
        /// Opening directive text.
        directive: String,
        /// Source line of the opening directive.
        line: usize,
        /// Source column of the opening directive.
        column: usize,
    },
    /// Namespace or class nesting exceeded the limit.
    #[error("nesting exceeds limit of {max_depth} at {line}:{column}")]
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Source line.
        line: usize,
        /// Source column.
        column: usize,
    },
}

// ============================================================================
// SECTION: Header Errors
// ============================================================================

/// Errors raised when loading and parsing a header file.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// I/O failure while reading the header.
    #[error("io error: {0}")]
    Io(String),
    /// Header file exceeds the configured size limit.
    #[error("header {path} exceeds {max_bytes} bytes")]
    TooLarge {
        /// Header path.
        path: String,
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// Header text could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Header path.
        path: String,
        /// Underlying parse failure.
        source: ParseError,
    },
}
