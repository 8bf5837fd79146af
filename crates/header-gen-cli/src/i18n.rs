// crates/header-gen-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for localized output.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The header-gen CLI stores user-facing strings in a small translation
//! catalog so that messaging stays consistent across commands. All runtime
//! output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_', '.']).next().unwrap_or("") {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "header-gen {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config validated successfully."),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("header.read_failed", "Failed to read header {path}: {error}"),
    ("header.parse_failed", "Failed to parse header {path}: {error}"),
    ("render.failed", "Failed to generate header from {path}: {error}"),
    ("generate.write_failed", "Failed to write generated header to {path}: {error}"),
    ("generate.ok", "Generated header written to {path} ({bytes} bytes)"),
    ("check.read_failed", "Failed to read expected header {path}: {error}"),
    ("check.drift", "Generated header drift detected for {path}. Run header-gen generate."),
    ("check.ok", "Generated header matches {path}"),
    ("parse.json_failed", "Failed to serialize header model: {error}"),
    ("parse.summary.header", "Header: {name}"),
    ("parse.summary.class", "Class: {name}"),
    ("parse.summary.class_none", "Class: none"),
    ("parse.summary.base", "Base class: {name}"),
    ("parse.summary.base_none", "Base class: none"),
    ("parse.summary.methods", "Methods: {count}"),
    ("parse.summary.members", "Member variables: {count}"),
    ("parse.summary.forward", "Forward declarations: {count}"),
    ("parse.summary.declarations", "Top-level declarations: {count}"),
    ("parse.summary.includes", "Includes: {count}"),
    ("parse.summary.init", "Init method: {present}"),
    ("parse.summary.yes", "yes"),
    ("parse.summary.no", "no"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "header-gen {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració validada correctament."),
    ("audit.open_failed", "No s'ha pogut obrir el registre d'auditoria {path}: {error}"),
    ("header.read_failed", "No s'ha pogut llegir la capçalera {path}: {error}"),
    ("header.parse_failed", "No s'ha pogut analitzar la capçalera {path}: {error}"),
    ("render.failed", "No s'ha pogut generar la capçalera a partir de {path}: {error}"),
    ("generate.write_failed", "No s'ha pogut escriure la capçalera generada a {path}: {error}"),
    ("generate.ok", "Capçalera generada escrita a {path} ({bytes} bytes)"),
    ("check.read_failed", "No s'ha pogut llegir la capçalera esperada {path}: {error}"),
    (
        "check.drift",
        "S'ha detectat una desviació de la capçalera generada per a {path}. Executeu header-gen \
         generate.",
    ),
    ("check.ok", "La capçalera generada coincideix amb {path}"),
    ("parse.json_failed", "No s'ha pogut serialitzar el model de capçalera: {error}"),
    ("parse.summary.header", "Capçalera: {name}"),
    ("parse.summary.class", "Classe: {name}"),
    ("parse.summary.class_none", "Classe: cap"),
    ("parse.summary.base", "Classe base: {name}"),
    ("parse.summary.base_none", "Classe base: cap"),
    ("parse.summary.methods", "Mètodes: {count}"),
    ("parse.summary.members", "Variables membre: {count}"),
    ("parse.summary.forward", "Declaracions anticipades: {count}"),
    ("parse.summary.declarations", "Declaracions de nivell superior: {count}"),
    ("parse.summary.includes", "Inclusions: {count}"),
    ("parse.summary.init", "Mètode init: {present}"),
    ("parse.summary.yes", "sí"),
    ("parse.summary.no", "no"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

/// Returns the catalog keys defined for `locale`, sorted.
#[must_use]
pub fn catalog_keys(locale: Locale) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = catalog_for(locale).keys().copied().collect();
    keys.sort_unstable();
    keys
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` for an explicit `locale`.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
