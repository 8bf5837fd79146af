// crates/header-gen-cli/src/lib.rs
// ============================================================================
// Module: Header Gen CLI Library
// Description: Shared helpers for the header-gen command-line interface.
// Purpose: Provide reusable components (i18n, audit) for the binary and tests.
// Dependencies: header-gen-config, serde, serde_json
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the internationalized
//! message catalog and the structured audit sinks. The binary entry point
//! (`src/main.rs`) imports these helpers to keep all user-facing output and
//! command logging consistent.
//!
//! Security posture: CLI inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured audit events and sinks.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
