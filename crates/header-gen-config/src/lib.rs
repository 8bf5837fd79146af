// crates/header-gen-config/src/lib.rs
// ============================================================================
// Module: Header Gen Config Library
// Description: Generator configuration model and loader.
// Purpose: Expose the TOML-backed settings shared by the renderer and CLI.
// Dependencies: header-gen-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration for the header generator: parser annotations and limits,
//! the type-to-include map, type aliases, output options, and audit logging.
//! Security posture: config inputs are untrusted and are validated before use.

pub mod config;

pub use config::*;
