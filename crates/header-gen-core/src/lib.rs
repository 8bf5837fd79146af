// crates/header-gen-core/src/lib.rs
// ============================================================================
// Module: Header Gen Core Library
// Description: C++ header lexer, declaration parser, and header model.
// Purpose: Read class headers into a deterministic, serializable model.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Header Gen Core reads C++ class headers into a [`HeaderFileModel`]: the
//! includes and directives, namespace-scope declarations with their
//! preprocessor conditions, and the single class definition with its methods,
//! members, and referenced types.
//! Invariants:
//! - Parsing is deterministic; the same input always yields the same model.
//! - Inputs are capped at [`ParseOptions::max_input_bytes`] (default
//!   [`MAX_HEADER_BYTES`]).
//! - Constructs outside the supported declaration subset fail with a
//!   positioned [`ParseError`].
//!
//! Security posture: header text is untrusted input and is bounded in size
//! and nesting depth.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
mod lexer;
pub mod model;
pub mod parser;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::HeaderError;
pub use error::ParseError;
pub use model::AccessSpecifier;
pub use model::BaseClass;
pub use model::BodySpecifier;
pub use model::ClassKeyword;
pub use model::ClassModel;
pub use model::Condition;
pub use model::Declaration;
pub use model::DeclarationKind;
pub use model::EnumModel;
pub use model::Enumerator;
pub use model::ForwardDeclaration;
pub use model::FunctionModel;
pub use model::HeaderFileModel;
pub use model::Include;
pub use model::MethodKind;
pub use model::MethodModel;
pub use model::Parameter;
pub use model::PreprocessorDirective;
pub use model::VariableModel;
pub use model::is_fundamental_type;
pub use model::render_parameters;
pub use parser::MAX_HEADER_BYTES;
pub use parser::MAX_NESTING;
pub use parser::ParseOptions;
pub use parser::parse_header;
pub use source::decode_latin1;
pub use source::parse_header_file;

#[cfg(test)]
mod lexer_tests;
