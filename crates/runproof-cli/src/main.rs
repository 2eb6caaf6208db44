// crates/runproof-cli/src/main.rs
// ============================================================================
// Module: RunProof CLI Entry Point
// Description: Command dispatcher for manifest, sidecar, pack, and index tasks.
// Purpose: Provide a safe, localized CLI over the RunProof evidence core.
// Dependencies: clap, runproof-config, runproof-core, serde, thiserror, time.
// ============================================================================

//! ## Overview
//! The RunProof CLI drives the evidence workflows consumed by the research
//! pipeline's orchestration layer: building and validating manifests,
//! checking sidecar checksums, generating and validating evidence packs,
//! aggregating the evidence index, and comparing reports for determinism.
//! All user-facing strings are routed through the i18n catalog. Every
//! validation writes its report artifact whether it passes or fails, and
//! failures always exit non-zero; failure is never silent.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use runproof_cli::i18n::Locale;
use runproof_cli::i18n::set_locale;
use runproof_cli::t;
use runproof_config::RunproofConfig;
use runproof_core::ComparisonResult;
use runproof_core::DeterminismContract;
use runproof_core::EvidenceManifest;
use runproof_core::MANIFEST_SCHEMA_VERSION;
use runproof_core::MAX_DOCUMENT_BYTES;
use runproof_core::ManifestValidator;
use runproof_core::PackError;
use runproof_core::SchemaVersion;
use runproof_core::VALIDATION_REPORT_SCHEMA_VERSION;
use runproof_core::ValidationReport;
use runproof_core::compare_reports;
use runproof_core::manifest::DEFAULT_REPORT_FILE_NAME;
use runproof_core::validate_sidecar;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for validation and comparison failures.
const EXIT_VALIDATION_FAILED: u8 = 2;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "RUNPROOF_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "runproof", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `RUNPROOF_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evidence manifest utilities.
    Manifest {
        /// Selected manifest subcommand.
        #[command(subcommand)]
        command: ManifestCommand,
    },
    /// Sidecar checksum utilities.
    Sidecar {
        /// Selected sidecar subcommand.
        #[command(subcommand)]
        command: SidecarCommand,
    },
    /// Evidence pack utilities.
    Pack {
        /// Selected pack subcommand.
        #[command(subcommand)]
        command: PackCommand,
    },
    /// Evidence index utilities.
    Index {
        /// Selected index subcommand.
        #[command(subcommand)]
        command: IndexCommand,
    },
    /// Report determinism utilities.
    Report {
        /// Selected report subcommand.
        #[command(subcommand)]
        command: ReportCommand,
    },
}

/// Manifest subcommands.
#[derive(Subcommand, Debug)]
enum ManifestCommand {
    /// Build a manifest from a directory tree.
    Build(ManifestBuildCommand),
    /// Validate a directory tree against a manifest.
    Validate(ManifestValidateCommand),
}

/// Sidecar subcommands.
#[derive(Subcommand, Debug)]
enum SidecarCommand {
    /// Check a sidecar's format and name binding.
    Check(SidecarCheckCommand),
}

/// Pack subcommands.
#[derive(Subcommand, Debug)]
enum PackCommand {
    /// Generate an evidence pack from an input directory.
    Generate(PackGenerateCommand),
    /// Validate an evidence pack from its manifest.
    Validate(PackValidateCommand),
}

/// Index subcommands.
#[derive(Subcommand, Debug)]
enum IndexCommand {
    /// Rebuild the evidence index from a packs root.
    Update(IndexUpdateCommand),
}

/// Report subcommands.
#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Compare two reports under a determinism contract.
    Compare(ReportCompareCommand),
}

/// Arguments for `manifest build`.
#[derive(Args, Debug)]
struct ManifestBuildCommand {
    /// Root directory to index.
    #[arg(long, value_name = "DIR")]
    root: PathBuf,
    /// Output path for the manifest document.
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
    /// Research run date recorded in the manifest (`YYYY-MM-DD`).
    #[arg(long = "run-date", value_name = "DATE")]
    run_date: Option<String>,
    /// Generation timestamp recorded in the manifest (RFC 3339; defaults to
    /// the current time).
    #[arg(long = "generated-at", value_name = "RFC3339")]
    generated_at: Option<String>,
    /// Index every file instead of the report-extension safelist.
    #[arg(long = "all-files", action = ArgAction::SetTrue)]
    all_files: bool,
    /// Optional config file path (defaults to runproof.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `manifest validate`.
#[derive(Args, Debug)]
struct ManifestValidateCommand {
    /// Root directory to validate.
    #[arg(long, value_name = "DIR")]
    root: PathBuf,
    /// Path to the manifest document to validate against.
    #[arg(long, value_name = "PATH")]
    index: PathBuf,
    /// Output path for the validation report (written on pass and fail).
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
    /// Relative path that must be present in the manifest (repeatable).
    #[arg(long = "require", value_name = "REL_PATH")]
    require: Vec<String>,
    /// Optional config file path (defaults to runproof.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `sidecar check`.
#[derive(Args, Debug)]
struct SidecarCheckCommand {
    /// Path to the accompanied artifact.
    #[arg(long, value_name = "PATH")]
    artifact: PathBuf,
    /// Path to the sidecar checksum file.
    #[arg(long, value_name = "PATH")]
    sidecar: PathBuf,
}

/// Arguments for `pack generate`.
#[derive(Args, Debug)]
struct PackGenerateCommand {
    /// Base directory the captured layout is expressed relative to.
    #[arg(long = "base-dir", value_name = "DIR")]
    base_dir: PathBuf,
    /// Input directory captured into the pack.
    #[arg(long, value_name = "DIR")]
    input: PathBuf,
    /// Root directory packs are generated under.
    #[arg(long = "out-root", value_name = "DIR")]
    out_root: PathBuf,
    /// Pack identifier (becomes the pack directory name).
    #[arg(long = "pack-id", value_name = "ID")]
    pack_id: String,
    /// Pin timestamps to `--created-at` for byte-identical reruns.
    #[arg(long, action = ArgAction::SetTrue)]
    deterministic: bool,
    /// Pack creation timestamp (RFC 3339; required with `--deterministic`,
    /// defaults to the current time otherwise).
    #[arg(long = "created-at", value_name = "RFC3339")]
    created_at: Option<String>,
    /// Research run date recorded in the pack manifest (`YYYY-MM-DD`).
    #[arg(long = "run-date", value_name = "DATE")]
    run_date: Option<String>,
    /// Optional config file path (defaults to runproof.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `pack validate`.
#[derive(Args, Debug)]
struct PackValidateCommand {
    /// Path to the pack manifest.
    #[arg(long, value_name = "PATH")]
    manifest: PathBuf,
    /// Output path for the validation report (defaults to
    /// `validation_report.json` next to the manifest).
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// Optional config file path (defaults to runproof.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `index update`.
#[derive(Args, Debug)]
struct IndexUpdateCommand {
    /// Root directory containing generated packs.
    #[arg(long = "packs-root", value_name = "DIR")]
    packs_root: PathBuf,
    /// Output path for the index document.
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
    /// Optional config file path (defaults to runproof.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `report compare`.
#[derive(Args, Debug)]
struct ReportCompareCommand {
    /// Path to the baseline report document.
    #[arg(long, value_name = "PATH")]
    baseline: PathBuf,
    /// Path to the candidate report document.
    #[arg(long, value_name = "PATH")]
    candidate: PathBuf,
    /// Volatile key path excluded from comparison (repeatable; extends the
    /// configured contract).
    #[arg(long = "volatile", value_name = "KEYPATH")]
    volatile: Vec<String>,
    /// Decimal tolerance for numeric comparison (overrides the configured
    /// contract).
    #[arg(long, value_name = "DECIMAL")]
    tolerance: Option<String>,
    /// Optional config file path (defaults to runproof.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Supported language flags.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English output.
    En,
    /// Catalan output.
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
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Size-limited read failures.
#[derive(Debug)]
enum ReadLimitError {
    /// The underlying read failed.
    Io(std::io::Error),
    /// The file exceeds the in-memory size limit.
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: usize,
    },
}

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

/// Parses arguments and dispatches the selected command.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_locale(cli.lang)?;
    if cli.show_version {
        write_stdout_line(&t!("main.version", version = env!("CARGO_PKG_VERSION")))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        Cli::command()
            .print_long_help()
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Manifest {
            command: ManifestCommand::Build(command),
        } => command_manifest_build(&command),
        Commands::Manifest {
            command: ManifestCommand::Validate(command),
        } => command_manifest_validate(&command),
        Commands::Sidecar {
            command: SidecarCommand::Check(command),
        } => command_sidecar_check(&command),
        Commands::Pack {
            command: PackCommand::Generate(command),
        } => command_pack_generate(&command),
        Commands::Pack {
            command: PackCommand::Validate(command),
        } => command_pack_validate(&command),
        Commands::Index {
            command: IndexCommand::Update(command),
        } => command_index_update(&command),
        Commands::Report {
            command: ReportCommand::Compare(command),
        } => command_report_compare(&command),
    }
}

/// Resolves the CLI locale from the flag or environment.
fn init_locale(flag: Option<LangArg>) -> CliResult<()> {
    if let Some(lang) = flag {
        set_locale(lang.into());
        return Ok(());
    }
    match env::var(LANG_ENV) {
        Ok(value) if !value.is_empty() => Locale::parse(&value).map_or_else(
            || Err(CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))),
            |locale| {
                set_locale(locale);
                Ok(())
            },
        ),
        _ => Ok(()),
    }
}

// ============================================================================
// SECTION: Manifest Commands
// ============================================================================

/// Executes the manifest build command.
fn command_manifest_build(command: &ManifestBuildCommand) -> CliResult<ExitCode> {
    let config = load_cli_config(command.config.as_deref())?;
    let mut builder = config.manifest_builder();
    if command.all_files {
        builder = builder.allow_all_files();
    }
    if let Some(run_date) = &command.run_date {
        builder = builder.with_run_date(run_date.clone());
    }
    let generated_at = resolve_generated_at(command.generated_at.as_deref())?;
    builder = builder.with_generated_at(generated_at);

    let manifest = builder.build(&command.root).map_err(|err| {
        CliError::new(t!("manifest.build.failed", root = command.root.display(), error = err))
    })?;
    write_canonical_document(&command.out, &manifest, &t!("artifact.kind.manifest"))?;
    write_stdout_line(&t!(
        "manifest.build.ok",
        path = command.out.display(),
        count = manifest.entries.len()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the manifest validation command.
fn command_manifest_validate(command: &ManifestValidateCommand) -> CliResult<ExitCode> {
    let _config = load_cli_config(command.config.as_deref())?;
    let manifest: EvidenceManifest =
        read_json_with_limit(&command.index, &t!("artifact.kind.manifest"), MAX_DOCUMENT_BYTES)?;
    let validator = ManifestValidator::new();
    let report = validator.validate(&command.root, &manifest, &command.require);

    write_canonical_document(&command.out, &report, &t!("artifact.kind.report"))?;
    render_report(&report)?;
    Ok(report_exit_code(&report))
}

// ============================================================================
// SECTION: Sidecar Commands
// ============================================================================

/// Executes the sidecar check command.
fn command_sidecar_check(command: &SidecarCheckCommand) -> CliResult<ExitCode> {
    let line = validate_sidecar(&command.artifact, &command.sidecar)
        .map_err(|err| CliError::new(t!("sidecar.check.failed", error = err)))?;
    write_stdout_line(&t!(
        "sidecar.check.ok",
        path = command.sidecar.display(),
        name = line.file_name
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Pack Commands
// ============================================================================

/// Executes the pack generation command.
fn command_pack_generate(command: &PackGenerateCommand) -> CliResult<ExitCode> {
    let config = load_cli_config(command.config.as_deref())?;
    let generator = config.pack_generator();

    let created_at = if command.deterministic {
        let Some(value) = &command.created_at else {
            return Err(CliError::new(t!("pack.created_at.required")));
        };
        parse_rfc3339(value)?;
        value.clone()
    } else {
        resolve_generated_at(command.created_at.as_deref())?
    };

    let paths = generator
        .generate(
            &command.base_dir,
            &command.input,
            &command.out_root,
            &command.pack_id,
            &created_at,
            command.run_date.as_deref(),
        )
        .map_err(|err| CliError::new(t!("pack.generate.failed", error = err)))?;

    write_stdout_line(&t!("pack.generate.ok", path = paths.manifest_path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line(&t!("pack.generate.sidecar_ok", path = paths.sidecar_path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the pack validation command.
fn command_pack_validate(command: &PackValidateCommand) -> CliResult<ExitCode> {
    let config = load_cli_config(command.config.as_deref())?;
    let generator = config.pack_generator();
    let out = command.out.clone().unwrap_or_else(|| {
        command
            .manifest
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_REPORT_FILE_NAME)
    });

    let report = match generator.validate_pack(&command.manifest) {
        Ok(report) => report,
        // A malformed sidecar rejects the pack before any hashing, but the
        // failing report is still written so CI and humans inspect the same
        // artifact either way.
        Err(PackError::Sidecar(err)) => ValidationReport {
            schema_version: SchemaVersion::new(VALIDATION_REPORT_SCHEMA_VERSION),
            index_schema_version: SchemaVersion::new(MANIFEST_SCHEMA_VERSION),
            run_date: None,
            checked_entries: 0,
            ok: false,
            errors: vec![err.to_string()],
        },
        Err(err) => return Err(CliError::new(t!("pack.validate.failed", error = err))),
    };

    write_canonical_document(&out, &report, &t!("artifact.kind.report"))?;
    render_report(&report)?;
    Ok(report_exit_code(&report))
}

// ============================================================================
// SECTION: Index Commands
// ============================================================================

/// Executes the index update command.
fn command_index_update(command: &IndexUpdateCommand) -> CliResult<ExitCode> {
    let config = load_cli_config(command.config.as_deref())?;
    let aggregator = config.index_aggregator();
    let index = aggregator
        .update_index(&command.packs_root, &command.out)
        .map_err(|err| CliError::new(t!("index.update.failed", error = err)))?;
    write_stdout_line(&t!("index.update.ok", path = command.out.display(), count = index.count))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Report Commands
// ============================================================================

/// Executes the report comparison command.
fn command_report_compare(command: &ReportCompareCommand) -> CliResult<ExitCode> {
    let config = load_cli_config(command.config.as_deref())?;
    let baseline: Value =
        read_json_with_limit(&command.baseline, &t!("compare.kind.baseline"), MAX_DOCUMENT_BYTES)?;
    let candidate: Value = read_json_with_limit(
        &command.candidate,
        &t!("compare.kind.candidate"),
        MAX_DOCUMENT_BYTES,
    )?;

    let mut volatile = config.contract.volatile_paths.clone();
    volatile.extend(command.volatile.iter().cloned());
    let tolerance =
        command.tolerance.clone().or_else(|| config.contract.numeric_tolerance.clone());
    let contract = DeterminismContract::from_parts(&volatile, tolerance)
        .map_err(|err| CliError::new(t!("compare.contract_failed", error = err)))?;

    match compare_reports(&baseline, &candidate, &contract)
        .map_err(|err| CliError::new(t!("compare.failed", error = err)))?
    {
        ComparisonResult::Match => {
            write_stdout_line(&t!("compare.match"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        ComparisonResult::Divergence {
            path,
            baseline,
            candidate,
        } => {
            write_stdout_line(&t!(
                "compare.divergence",
                path = path,
                baseline = render_compare_value(baseline.as_ref()),
                candidate = render_compare_value(candidate.as_ref())
            ))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::from(EXIT_VALIDATION_FAILED))
        }
    }
}

/// Renders one side of a divergence for display.
fn render_compare_value(value: Option<&Value>) -> String {
    value.map_or_else(
        || t!("compare.value.absent"),
        |value| serde_json::to_string(value).unwrap_or_else(|_| "null".to_string()),
    )
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads CLI configuration with a localized failure message.
fn load_cli_config(path: Option<&Path>) -> CliResult<RunproofConfig> {
    RunproofConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Resolves an explicit or wall-clock RFC 3339 timestamp.
fn resolve_generated_at(explicit: Option<&str>) -> CliResult<String> {
    match explicit {
        Some(value) => {
            parse_rfc3339(value)?;
            Ok(value.to_string())
        }
        None => OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| CliError::new(t!("time.now_failed", error = err))),
    }
}

/// Validates an RFC 3339 timestamp argument.
fn parse_rfc3339(value: &str) -> CliResult<()> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map(|_| ())
        .map_err(|_| CliError::new(t!("time.invalid_rfc3339", value = value)))
}

/// Reads a file with the in-memory size limit applied.
fn read_bytes_with_limit(path: &Path, limit: usize) -> Result<Vec<u8>, ReadLimitError> {
    let metadata = fs::metadata(path).map_err(ReadLimitError::Io)?;
    if metadata.len() > u64::try_from(limit).unwrap_or(u64::MAX) {
        return Err(ReadLimitError::TooLarge {
            size: metadata.len(),
            limit,
        });
    }
    fs::read(path).map_err(ReadLimitError::Io)
}

/// Reads and parses a size-limited JSON document.
fn read_json_with_limit<T: DeserializeOwned>(
    path: &Path,
    kind: &str,
    limit: usize,
) -> CliResult<T> {
    let bytes = read_bytes_with_limit(path, limit).map_err(|err| match err {
        ReadLimitError::Io(error) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = error
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Writes a canonical JSON document with a trailing newline.
fn write_canonical_document<T: Serialize>(path: &Path, value: &T, kind: &str) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value).map_err(|err| {
        CliError::new(t!("output.artifact.serialize_failed", kind = kind, error = err))
    })?;
    bytes.push(b'\n');
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| {
            CliError::new(t!(
                "output.artifact.write_failed",
                kind = kind,
                path = path.display(),
                error = err
            ))
        })?;
    }
    fs::write(path, bytes).map_err(|err| {
        CliError::new(t!(
            "output.artifact.write_failed",
            kind = kind,
            path = path.display(),
            error = err
        ))
    })?;
    Ok(())
}

/// Renders a validation report's status and error lines.
fn render_report(report: &ValidationReport) -> CliResult<()> {
    let status =
        if report.ok { t!("validate.status.pass") } else { t!("validate.status.fail") };
    write_stdout_line(&t!(
        "validate.status",
        status = status,
        checked = report.checked_entries
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for error in &report.errors {
        write_stdout_line(&t!("validate.error_line", error = error))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Maps a report outcome to the CLI exit code contract.
fn report_exit_code(report: &ValidationReport) -> ExitCode {
    if report.ok { ExitCode::SUCCESS } else { ExitCode::from(EXIT_VALIDATION_FAILED) }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
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
