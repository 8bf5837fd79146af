// crates/header-gen-config/src/config.rs
// ============================================================================
// Module: Header Gen Configuration
// Description: Configuration loading and validation for the header generator.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: header-gen-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no path is given and the default file is absent, built-in defaults
//! apply; an explicitly named file that cannot be read fails closed.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use header_gen_core::MAX_HEADER_BYTES;
use header_gen_core::ParseOptions;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "header-gen.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "HEADER_GEN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `parser.max_input_bytes`.
pub const MAX_INPUT_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Maximum number of configured annotations.
pub(crate) const MAX_ANNOTATIONS: usize = 64;
/// Maximum number of type-to-include mappings.
pub(crate) const MAX_TYPE_INCLUDES: usize = 1024;
/// Maximum number of type aliases.
pub(crate) const MAX_TYPE_ALIASES: usize = 128;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Header generator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Parser settings.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Type include map and aliases.
    #[serde(default)]
    pub types: TypeConfig,
    /// Output formatting settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Audit logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GeneratorConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order is the explicit `path`, then [`CONFIG_ENV_VAR`], then
    /// `header-gen.toml` in the working directory. Only the last may be absent,
    /// in which case defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid TOML for this model
    /// or fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parser.validate()?;
        self.types.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Returns the parser options derived from the `[parser]` section.
    #[must_use]
    pub fn to_parse_options(&self) -> ParseOptions {
        ParseOptions {
            annotations: self.parser.annotations.clone(),
            max_input_bytes: self.parser.max_input_bytes,
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Marker identifiers recognized in front of method declarations.
    #[serde(default = "default_annotations")]
    pub annotations: Vec<String>,
    /// Maximum accepted header size in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            annotations: default_annotations(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl ParserConfig {
    /// Validates parser configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.annotations.len() > MAX_ANNOTATIONS {
            return Err(ConfigError::Invalid(format!(
                "parser.annotations exceeds {MAX_ANNOTATIONS} entries"
            )));
        }
        for annotation in &self.annotations {
            validate_identifier("parser.annotations", annotation)?;
        }
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_INPUT_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "parser.max_input_bytes must be between 1 and {MAX_INPUT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Type mapping configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    /// Type name (optionally `a::b::Name`) to the project include providing it.
    #[serde(default = "default_type_includes")]
    pub includes: BTreeMap<String, String>,
    /// Whole-word type spelling replacements applied to class types.
    #[serde(default = "default_type_aliases")]
    pub aliases: BTreeMap<String, String>,
}

impl Default for TypeConfig {
    fn default() -> Self {
        Self {
            includes: default_type_includes(),
            aliases: default_type_aliases(),
        }
    }
}

impl TypeConfig {
    /// Returns the include path mapped to `type_name`, if any.
    #[must_use]
    pub fn include_for(&self, type_name: &str) -> Option<&str> {
        self.includes.get(type_name).map(String::as_str)
    }

    /// Validates type configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.includes.len() > MAX_TYPE_INCLUDES {
            return Err(ConfigError::Invalid(format!(
                "types.includes exceeds {MAX_TYPE_INCLUDES} entries"
            )));
        }
        for (type_name, include) in &self.includes {
            validate_qualified_identifier("types.includes", type_name)?;
            validate_include_path(&format!("types.includes.{type_name}"), include)?;
        }
        if self.aliases.len() > MAX_TYPE_ALIASES {
            return Err(ConfigError::Invalid(format!(
                "types.aliases exceeds {MAX_TYPE_ALIASES} entries"
            )));
        }
        for (word, replacement) in &self.aliases {
            validate_identifier("types.aliases", word)?;
            let mut words = replacement.split_whitespace().peekable();
            if words.peek().is_none() {
                return Err(ConfigError::Invalid(format!("types.aliases.{word} must be non-empty")));
            }
            for part in words {
                validate_qualified_identifier(&format!("types.aliases.{word}"), part)?;
            }
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit the `@generated` banner and source line.
    #[serde(default = "default_banner")]
    pub banner: bool,
    /// System includes prepended when the header does not already have them.
    #[serde(default = "default_system_includes")]
    pub default_system_includes: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            banner: default_banner(),
            default_system_includes: default_system_includes(),
        }
    }
}

impl OutputConfig {
    /// Validates output configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for include in &self.default_system_includes {
            validate_include_path("output.default_system_includes", include)?;
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    /// No audit output.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `logging.audit_path`.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditMode,
    /// Audit log path (JSON lines) for [`AuditMode::File`].
    #[serde(default)]
    pub audit_path: Option<String>,
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.audit_path {
            validate_path_string("logging.audit_path", path)?;
        }
        if self.audit == AuditMode::File && self.audit_path.is_none() {
            return Err(ConfigError::Invalid(
                "logging.audit = \"file\" requires logging.audit_path".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default method annotations.
fn default_annotations() -> Vec<String> {
    vec!["Unsafe".to_string(), "Nowrapper".to_string()]
}

/// Default header size limit.
pub(crate) const fn default_max_input_bytes() -> usize {
    MAX_HEADER_BYTES
}

/// Default type-to-include map.
fn default_type_includes() -> BTreeMap<String, String> {
    BTreeMap::from([("flags".to_string(), "flags/flags.h".to_string())])
}

/// Default type aliases.
fn default_type_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("long".to_string(), "long int".to_string())])
}

/// Default banner setting.
pub(crate) const fn default_banner() -> bool {
    true
}

/// Default system includes.
fn default_system_includes() -> Vec<String> {
    vec!["string".to_string()]
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// The flag is true when the path was named explicitly or through the
/// environment.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an include path; it is emitted between `<>` or `""` delimiters.
fn validate_include_path(field: &str, value: &str) -> Result<(), ConfigError> {
    validate_path_string(field, value)?;
    if value.trim() != value {
        return Err(ConfigError::Invalid(format!("{field} must not have surrounding whitespace")));
    }
    if value.contains(['<', '>', '"', '\n', '\r']) {
        return Err(ConfigError::Invalid(format!(
            "{field} must not contain include delimiters: {value}"
        )));
    }
    Ok(())
}

/// Returns true when `value` is a valid C++ identifier.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Validates a single C++ identifier.
fn validate_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} entry is not a valid identifier: {value:?}")))
    }
}

/// Validates an `a::b::Name` spelling.
fn validate_qualified_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.split("::").all(is_identifier) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} entry is not a valid identifier: {value:?}")))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
