// crates/header-gen-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Logging
// Description: Structured audit events for header-gen commands.
// Purpose: Emit one JSON line per command without a logging framework.
// Dependencies: header-gen-config, serde, serde_json
// ============================================================================

//! ## Overview
//! Every CLI command records a single [`HeaderGenAuditEvent`] describing what
//! was processed and how it ended. Events are serialized as JSON lines and
//! routed to stderr, an append-only file, or nowhere, depending on the
//! `[logging]` configuration and the `--audit-log` override.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use header_gen_config::AuditMode;
use header_gen_config::LoggingConfig;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Final status of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Command completed.
    Ok,
    /// Command failed.
    Error,
}

/// Command audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderGenAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Command label (`generate`, `check`, `parse`, `config_validate`).
    pub command: &'static str,
    /// Input path when the command reads one.
    pub input: Option<String>,
    /// Command outcome.
    pub outcome: AuditOutcome,
    /// Parsed class name when available.
    pub class_name: Option<String>,
    /// Bytes produced by the command when available.
    pub output_bytes: Option<usize>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a command audit event.
pub struct HeaderGenAuditEventParams {
    /// Command label.
    pub command: &'static str,
    /// Input path when the command reads one.
    pub input: Option<String>,
    /// Command outcome.
    pub outcome: AuditOutcome,
    /// Parsed class name when available.
    pub class_name: Option<String>,
    /// Bytes produced by the command when available.
    pub output_bytes: Option<usize>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl HeaderGenAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: HeaderGenAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "header_gen_command",
            timestamp_ms,
            command: params.command,
            input: params.input,
            outcome: params.outcome,
            class_name: params.class_name,
            output_bytes: params.output_bytes,
            error_kind: params.error_kind,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for command events.
pub trait HeaderGenAuditSink: Send + Sync {
    /// Record a command audit event.
    fn record(&self, event: &HeaderGenAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl HeaderGenAuditSink for StderrAuditSink {
    fn record(&self, event: &HeaderGenAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl HeaderGenAuditSink for FileAuditSink {
    fn record(&self, event: &HeaderGenAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl HeaderGenAuditSink for NoopAuditSink {
    fn record(&self, _event: &HeaderGenAuditEvent) {}
}

/// Builds the audit sink selected by configuration.
///
/// An explicit `override_path` always selects a file sink.
///
/// # Errors
///
/// Returns an error when a file sink cannot be opened.
pub fn build_audit_sink(
    logging: &LoggingConfig,
    override_path: Option<&Path>,
) -> io::Result<Box<dyn HeaderGenAuditSink>> {
    if let Some(path) = override_path {
        return Ok(Box::new(FileAuditSink::new(path)?));
    }
    match (logging.audit, logging.audit_path.as_deref()) {
        (AuditMode::None, _) => Ok(Box::new(NoopAuditSink)),
        (AuditMode::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditMode::File, Some(path)) => Ok(Box::new(FileAuditSink::new(Path::new(path.trim()))?)),
        (AuditMode::File, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "logging.audit_path is required for file audit logging",
        )),
    }
}
