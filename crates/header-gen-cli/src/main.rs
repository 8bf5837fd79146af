// crates/header-gen-cli/src/main.rs
// ============================================================================
// Module: Header Gen CLI Entry Point
// Description: Command dispatcher for header parsing and regeneration.
// Purpose: Provide a safe, localized CLI for generate, check, and parse tasks.
// Dependencies: clap, header-gen-config, header-gen-core, header-gen-render, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The header-gen CLI reads a C++ class header, builds its header model, and
//! either regenerates the header, checks a committed header for drift, or
//! prints the model. All user-facing strings are routed through the i18n
//! catalog. Every command records one audit event through the configured sink.
//!
//! Security posture: header files and config files are untrusted; reads are
//! bounded and outputs are written atomically.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use header_gen_cli::audit::AuditOutcome;
use header_gen_cli::audit::HeaderGenAuditEvent;
use header_gen_cli::audit::HeaderGenAuditEventParams;
use header_gen_cli::audit::HeaderGenAuditSink;
use header_gen_cli::audit::build_audit_sink;
use header_gen_cli::i18n::Locale;
use header_gen_cli::i18n::set_locale;
use header_gen_cli::t;
use header_gen_config::GeneratorConfig;
use header_gen_config::LoggingConfig;
use header_gen_core::HeaderError;
use header_gen_core::HeaderFileModel;
use header_gen_core::parse_header_file;
use header_gen_render::HeaderGenerator;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "HEADER_GEN_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "header-gen", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `HEADER_GEN_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Append audit events to this file (overrides `[logging]`).
    #[arg(long = "audit-log", value_name = "PATH", global = true)]
    audit_log: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate a class header from its source header.
    Generate(GenerateCommand),
    /// Verify a committed header matches the regenerated output.
    Check(CheckCommand),
    /// Print the parsed header model.
    Parse(ParseCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a header-gen configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
struct GenerateCommand {
    /// Source header to parse.
    #[arg(long, value_name = "HEADER")]
    input: PathBuf,
    /// Output path (defaults to stdout).
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Optional config file path (defaults to header-gen.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Source header to parse.
    #[arg(long, value_name = "HEADER")]
    input: PathBuf,
    /// Committed generated header to compare against.
    #[arg(long, value_name = "FILE")]
    expected: PathBuf,
    /// Optional config file path (defaults to header-gen.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `parse`.
#[derive(Args, Debug)]
struct ParseCommand {
    /// Source header to parse.
    #[arg(long, value_name = "HEADER")]
    input: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    /// Optional config file path (defaults to header-gen.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to header-gen.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats for the `parse` command.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Pretty-printed JSON header model.
    Json,
    /// Human-readable summary.
    Text,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Stable error label recorded in audit events.
    kind: &'static str,
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from an error label and localized message.
    const fn new(kind: &'static str, message: String) -> Self {
        Self {
            kind,
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new("output", output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let audit_log = cli.audit_log.as_deref();
    match command {
        Commands::Generate(command) => command_generate(&command, audit_log),
        Commands::Check(command) => command_check(&command, audit_log),
        Commands::Parse(command) => command_parse(&command, audit_log),
        Commands::Config {
            command,
        } => command_config(command, audit_log),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Audit Wiring
// ============================================================================

/// Facts about a completed command, recorded in its audit event.
#[derive(Debug, Default)]
struct CommandReport {
    /// Parsed class name.
    class_name: Option<String>,
    /// Bytes produced.
    output_bytes: Option<usize>,
}

/// Loads configuration, runs `body`, and records exactly one audit event.
fn run_audited<F>(
    command: &'static str,
    input: Option<&Path>,
    config_path: Option<&Path>,
    audit_log: Option<&Path>,
    body: F,
) -> CliResult<ExitCode>
where
    F: FnOnce(&GeneratorConfig) -> CliResult<CommandReport>,
{
    let config = match GeneratorConfig::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            let error = CliError::new("config", t!("config.load_failed", error = err));
            // Only an explicit --audit-log can observe a config failure.
            if let Ok(sink) = build_audit_sink(&LoggingConfig::default(), audit_log) {
                record_outcome(sink.as_ref(), command, input, &Err(&error));
            }
            return Err(error);
        }
    };
    let sink = build_audit_sink(&config.logging, audit_log).map_err(|err| {
        let path = audit_log
            .map(|path| path.display().to_string())
            .or_else(|| config.logging.audit_path.clone())
            .unwrap_or_default();
        CliError::new("audit", t!("audit.open_failed", path = path, error = err))
    })?;
    let result = body(&config);
    record_outcome(sink.as_ref(), command, input, &result.as_ref());
    result.map(|_| ExitCode::SUCCESS)
}

/// Records the audit event for a command result.
fn record_outcome(
    sink: &dyn HeaderGenAuditSink,
    command: &'static str,
    input: Option<&Path>,
    result: &Result<&CommandReport, &CliError>,
) {
    let (outcome, report, error_kind) = match result {
        Ok(report) => (AuditOutcome::Ok, Some(*report), None),
        Err(err) => (AuditOutcome::Error, None, Some(err.kind)),
    };
    sink.record(&HeaderGenAuditEvent::new(HeaderGenAuditEventParams {
        command,
        input: input.map(|path| path.display().to_string()),
        outcome,
        class_name: report.and_then(|report| report.class_name.clone()),
        output_bytes: report.and_then(|report| report.output_bytes),
        error_kind,
    }));
}

// ============================================================================
// SECTION: Header Commands
// ============================================================================

/// Executes the `generate` command.
fn command_generate(command: &GenerateCommand, audit_log: Option<&Path>) -> CliResult<ExitCode> {
    run_audited(
        "generate",
        Some(&command.input),
        command.config.as_deref(),
        audit_log,
        |config| {
            let model = load_model(&command.input, config)?;
            let header = render_model(&model, config, &command.input)?;
            match &command.out {
                Some(out) => {
                    write_output(out, &header).map_err(|err| {
                        CliError::new(
                            "write",
                            t!("generate.write_failed", path = out.display(), error = err),
                        )
                    })?;
                    write_stdout_line(&t!(
                        "generate.ok",
                        path = out.display(),
                        bytes = header.len()
                    ))
                    .map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
                }
                None => write_stdout_bytes(header.as_bytes())
                    .map_err(|err| CliError::new("output", output_error("stdout", &err)))?,
            }
            Ok(report_for(&model, header.len()))
        },
    )
}

/// Executes the `check` command.
fn command_check(command: &CheckCommand, audit_log: Option<&Path>) -> CliResult<ExitCode> {
    run_audited(
        "check",
        Some(&command.input),
        command.config.as_deref(),
        audit_log,
        |config| {
            let model = load_model(&command.input, config)?;
            let header = render_model(&model, config, &command.input)?;
            check_output(&command.expected, &header)?;
            write_stdout_line(&t!("check.ok", path = command.expected.display()))
                .map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
            Ok(report_for(&model, header.len()))
        },
    )
}

/// Executes the `parse` command.
fn command_parse(command: &ParseCommand, audit_log: Option<&Path>) -> CliResult<ExitCode> {
    run_audited("parse", Some(&command.input), command.config.as_deref(), audit_log, |config| {
        let model = load_model(&command.input, config)?;
        let rendered = match command.format {
            OutputFormat::Json => serde_json::to_string_pretty(&model).map_err(|err| {
                CliError::new("serialize", t!("parse.json_failed", error = err))
            })?,
            OutputFormat::Text => summarize_model(&model).join("\n"),
        };
        write_stdout_line(&rendered)
            .map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
        Ok(report_for(&model, rendered.len()))
    })
}

/// Parses the input header with the configured parser options.
fn load_model(input: &Path, config: &GeneratorConfig) -> CliResult<HeaderFileModel> {
    parse_header_file(input, &config.to_parse_options()).map_err(|err| match err {
        HeaderError::Parse {
            source, ..
        } => CliError::new(
            "parse",
            t!("header.parse_failed", path = input.display(), error = source),
        ),
        other => CliError::new(
            "read",
            t!("header.read_failed", path = input.display(), error = other),
        ),
    })
}

/// Renders the regenerated header text for `model`.
fn render_model(
    model: &HeaderFileModel,
    config: &GeneratorConfig,
    input: &Path,
) -> CliResult<String> {
    HeaderGenerator::new(model, config).generate_header().map_err(|err| {
        CliError::new("render", t!("render.failed", path = input.display(), error = err))
    })
}

/// Builds the audit report for a parsed model.
fn report_for(model: &HeaderFileModel, output_bytes: usize) -> CommandReport {
    CommandReport {
        class_name: model.class_model().map(|class| class.name.clone()),
        output_bytes: Some(output_bytes),
    }
}

/// Builds the localized text summary of a header model.
fn summarize_model(model: &HeaderFileModel) -> Vec<String> {
    let class = model.class_model();
    let mut lines = vec![t!("parse.summary.header", name = model.name)];
    lines.push(class.map_or_else(
        || t!("parse.summary.class_none"),
        |class| t!("parse.summary.class", name = class.name),
    ));
    lines.push(class.and_then(|class| class.base_class()).map_or_else(
        || t!("parse.summary.base_none"),
        |base| t!("parse.summary.base", name = base),
    ));
    lines.push(t!("parse.summary.methods", count = class.map_or(0, |class| class.methods.len())));
    lines.push(t!(
        "parse.summary.members",
        count = class.map_or(0, |class| class.member_variables.len())
    ));
    lines.push(t!(
        "parse.summary.forward",
        count = class.map_or(0, |class| class.forward_declarations.len())
    ));
    lines.push(t!("parse.summary.declarations", count = model.declarations.len()));
    lines.push(t!("parse.summary.includes", count = model.includes.len()));
    let present = if class.is_some_and(|class| class.has_init_method()) {
        t!("parse.summary.yes")
    } else {
        t!("parse.summary.no")
    };
    lines.push(t!("parse.summary.init", present = present));
    lines
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand, audit_log: Option<&Path>) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command, audit_log),
    }
}

/// Executes the config validation command.
fn command_config_validate(
    command: &ConfigValidateCommand,
    audit_log: Option<&Path>,
) -> CliResult<ExitCode> {
    run_audited("config_validate", None, command.config.as_deref(), audit_log, |_config| {
        write_stdout_line(&t!("config.validate.ok"))
            .map_err(|err| CliError::new("output", output_error("stdout", &err)))?;
        Ok(CommandReport::default())
    })
}

// ============================================================================
// SECTION: Locale Helpers
// ============================================================================

/// Resolves the output locale from the flag, then the environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new("locale", t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: File Output
// ============================================================================

/// Maximum attempts when allocating a temporary output path.
const TEMP_ATTEMPTS: usize = 16;
/// Counter that keeps temporary output names unique within the process.
static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Writes `contents` to `path` through a synced temporary file and rename.
fn write_output(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let (temp_path, mut file) = create_temp_output(path)?;
    if let Err(err) = file.write_all(contents.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    if let Err(err) = file.sync_all() {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    drop(file);
    persist_temp_output(&temp_path, path)
}

/// Creates a unique temporary output file alongside the destination.
fn create_temp_output(path: &Path) -> io::Result<(PathBuf, fs::File)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path does not include a file name")
    })?;
    for _ in 0 .. TEMP_ATTEMPTS {
        let attempt = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_name = format!(".{file_name}.tmp.{}.{}", std::process::id(), attempt);
        let temp_path = parent.join(temp_name);
        match OpenOptions::new().write(true).create_new(true).open(&temp_path) {
            Ok(file) => return Ok((temp_path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::other("failed to allocate temporary output path"))
}

/// Persists the temporary output file to the final destination.
fn persist_temp_output(temp_path: &Path, path: &Path) -> io::Result<()> {
    match fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(temp_path, path)?;
                return Ok(());
            }
            let _ = fs::remove_file(temp_path);
            Err(err)
        }
    }
}

/// Compares the generated contents against the committed header.
fn check_output(path: &Path, contents: &str) -> CliResult<()> {
    let existing = fs::read(path).map_err(|err| {
        CliError::new("read", t!("check.read_failed", path = path.display(), error = err))
    })?;
    if existing != contents.as_bytes() {
        return Err(CliError::new("drift", t!("check.drift", path = path.display())));
    }
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(bytes)?;
    stdout.flush()
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> io::Result<()> {
    let mut stderr = io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
