// crates/header-gen-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for locale resolution, atomic output, and summaries.
// Purpose: Ensure CLI helpers fail closed and never leave partial outputs.
// Dependencies: header-gen-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Validates the private helpers behind the `header-gen` binary: locale
//! resolution, temp-file-and-rename output, drift checks, and the text
//! summary printed by `parse --format text`.
//!
//! Security posture: CLI inputs are untrusted; outputs must be replaced
//! atomically.

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

use std::fs;

use header_gen_core::ParseOptions;
use header_gen_core::parse_header;

use super::LangArg;
use super::Locale;
use super::check_output;
use super::resolve_locale;
use super::summarize_model;
use super::write_output;

// ============================================================================
// SECTION: Locale Resolution
// ============================================================================

#[test]
fn flag_overrides_environment_locale() {
    let locale = resolve_locale(Some(LangArg::En), Some("ca")).unwrap();
    assert_eq!(locale, Locale::En);
}

#[test]
fn environment_locale_accepts_region_tags() {
    assert_eq!(resolve_locale(None, Some("ca_ES.UTF-8")).unwrap(), Locale::Ca);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
}

#[test]
fn invalid_environment_locale_is_rejected() {
    let err = resolve_locale(None, Some("fr")).unwrap_err();
    assert_eq!(err.kind, "locale");
    assert!(err.to_string().contains("HEADER_GEN_LANG"), "message: {err}");
    assert!(err.to_string().contains("fr"), "message: {err}");
}

// ============================================================================
// SECTION: File Output
// ============================================================================

#[test]
fn write_output_replaces_existing_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Widget.h");
    fs::write(&path, "stale\n").unwrap();

    write_output(&path, "#pragma once\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "#pragma once\n");
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temporary files must not remain");
}

#[test]
fn write_output_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out").join("Widget.h");
    write_output(&path, "#pragma once\n").unwrap();
    assert!(path.is_file());
}

#[test]
fn check_output_reports_drift_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Widget.h");
    fs::write(&path, "#pragma once\n").unwrap();

    assert!(check_output(&path, "#pragma once\n").is_ok());

    let drift = check_output(&path, "#pragma once\n\nclass Widget;\n").unwrap_err();
    assert_eq!(drift.kind, "drift");
    assert!(drift.to_string().contains("drift"), "message: {drift}");

    let missing = check_output(&dir.path().join("Missing.h"), "").unwrap_err();
    assert_eq!(missing.kind, "read");
}

// ============================================================================
// SECTION: Summaries
// ============================================================================

#[test]
fn summary_lists_class_base_and_counts() {
    let source = "#include <string>\n\
                  class Engine;\n\
                  class Widget : public Base {\n\
                  public:\n\
                  \tvoid init();\n\
                  \tint size() const;\n\
                  private:\n\
                  \tEngine* mEngine;\n\
                  };\n";
    let mut model = parse_header(source, &ParseOptions::default()).unwrap();
    model.name = "Widget.h".to_string();

    let lines = summarize_model(&model);
    assert_eq!(
        lines,
        vec![
            "Header: Widget.h",
            "Class: Widget",
            "Base class: Base",
            "Methods: 2",
            "Member variables: 1",
            "Forward declarations: 1",
            "Top-level declarations: 1",
            "Includes: 1",
            "Init method: yes",
        ]
    );
}

#[test]
fn summary_without_class_reports_none() {
    let model = parse_header("int counter = 0;\n", &ParseOptions::default()).unwrap();
    let lines = summarize_model(&model);
    assert_eq!(lines[1], "Class: none");
    assert_eq!(lines[2], "Base class: none");
    assert_eq!(lines[3], "Methods: 0");
    assert_eq!(lines[8], "Init method: no");
}
