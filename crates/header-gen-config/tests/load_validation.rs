//! Config load validation tests for header-gen-config.
// crates/header-gen-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, schema).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use header_gen_config::AuditMode;
use header_gen_config::ConfigError;
use header_gen_config::GeneratorConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<GeneratorConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(GeneratorConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(GeneratorConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(GeneratorConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(GeneratorConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match GeneratorConfig::load(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config("[output]\nbanner = true\ncolour = \"red\"\n")?;
    assert_invalid(GeneratorConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_empty_file_uses_defaults() -> TestResult {
    let file = write_config("")?;
    let config = GeneratorConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.parser.annotations != ["Unsafe", "Nowrapper"] {
        return Err(format!("unexpected annotations {:?}", config.parser.annotations));
    }
    if config.types.include_for("flags") != Some("flags/flags.h") {
        return Err("default flags include missing".to_string());
    }
    if config.types.aliases.get("long").map(String::as_str) != Some("long int") {
        return Err("default long alias missing".to_string());
    }
    if !config.output.banner || config.output.default_system_includes != ["string"] {
        return Err("unexpected output defaults".to_string());
    }
    if config.logging.audit != AuditMode::None {
        return Err("audit should default to none".to_string());
    }
    Ok(())
}

#[test]
fn load_reads_all_sections() -> TestResult {
    let file = write_config(
        r#"
[parser]
annotations = ["Unsafe", "Nowrapper", "Threadsafe"]
max_input_bytes = 65536

[types]
includes = { flags = "flags/flags.h", "abc::def::foo" = "abc/foo.h" }
aliases = {}

[output]
banner = false
default_system_includes = ["string", "memory"]

[logging]
audit = "file"
audit_path = "logs/header-gen.jsonl"
"#,
    )?;
    let config = GeneratorConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let options = config.to_parse_options();
    if options.annotations.len() != 3 || options.max_input_bytes != 65_536 {
        return Err(format!("unexpected parse options {options:?}"));
    }
    if config.types.include_for("abc::def::foo") != Some("abc/foo.h") {
        return Err("qualified include mapping missing".to_string());
    }
    if !config.types.aliases.is_empty() {
        return Err("explicit empty aliases should override defaults".to_string());
    }
    if config.output.banner || config.output.default_system_includes.len() != 2 {
        return Err("output section not applied".to_string());
    }
    if config.logging.audit != AuditMode::File {
        return Err("audit mode not applied".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_file_audit_without_path() -> TestResult {
    let file = write_config("[logging]\naudit = \"file\"\n")?;
    assert_invalid(GeneratorConfig::load(Some(file.path())), "requires logging.audit_path")?;
    Ok(())
}
