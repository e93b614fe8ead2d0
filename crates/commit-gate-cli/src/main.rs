// crates/commit-gate-cli/src/main.rs
// ============================================================================
// Module: SVN Commit Gate CLI Entry Point
// Description: Command dispatcher for the pre-commit hook and admin utilities.
// Purpose: Run the commit gate from an SVN hook and support offline checks.
// Dependencies: clap, commit-gate-config, commit-gate-core, commit-gate-providers
// ============================================================================

//! ## Overview
//! `svn-commit-gate pre-commit <REPOS> <TXN>` is meant to be called from the
//! repository's `hooks/pre-commit` script. It validates the commit message,
//! enforces immutable tags and rejects known hash collision payloads, in that
//! order. Any gate error is written to stderr, which SVN relays to the
//! committer, and the process exits with status 1. Configuration problems exit
//! with status 2 so administrators can tell them apart from rejected commits.
//! A log destination that cannot be opened is skipped during hook runs.
//!
//! The remaining subcommands run offline: `config validate`, `tags check`
//! (evaluate changed-path lines against a tag policy) and `collision scan`
//! (hash local files against the configured signatures).

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use commit_gate_config::ConfigError;
use commit_gate_config::GateConfig;
use commit_gate_core::ChangedPath;
use commit_gate_core::CommitGate;
use commit_gate_core::GateError;
use commit_gate_core::HookInvocation;
use commit_gate_core::ImmutableTagConfiguration;
use commit_gate_core::TagDecision;
use commit_gate_core::TagPolicy;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "svn-commit-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check an in-flight transaction (SVN `pre-commit` hook entry point).
    PreCommit(PreCommitCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Immutable tag utilities.
    Tags {
        /// Selected tags subcommand.
        #[command(subcommand)]
        command: TagsCommand,
    },
    /// Collision signature utilities.
    Collision {
        /// Selected collision subcommand.
        #[command(subcommand)]
        command: CollisionCommand,
    },
}

/// Arguments for the `pre-commit` command.
#[derive(Args, Debug)]
struct PreCommitCommand {
    /// Optional config file path (defaults to svn-commit-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Repository path passed by SVN.
    #[arg(value_name = "REPOS")]
    repository: PathBuf,
    /// Transaction name passed by SVN.
    #[arg(value_name = "TXN")]
    transaction: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to svn-commit-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Tags subcommands.
#[derive(Subcommand, Debug)]
enum TagsCommand {
    /// Evaluate changed-path lines against an immutable tag policy.
    Check(TagsCheckCommand),
}

/// Arguments for `tags check`.
#[derive(Args, Debug)]
struct TagsCheckCommand {
    /// Protected path patterns; repeat the flag or separate lines with newlines.
    #[arg(long = "paths", value_name = "TEXT", required = true)]
    paths: Vec<String>,
    /// Whitelisted path patterns; repeat the flag or separate lines with newlines.
    #[arg(long = "whitelist", value_name = "TEXT")]
    whitelist: Vec<String>,
    /// Changed-path lines in `svnlook changed` format.
    #[arg(value_name = "LINE", required = true)]
    lines: Vec<String>,
}

/// Collision subcommands.
#[derive(Subcommand, Debug)]
enum CollisionCommand {
    /// Scan local files against the configured collision signatures.
    Scan(CollisionScanCommand),
}

/// Arguments for `collision scan`.
#[derive(Args, Debug)]
struct CollisionScanCommand {
    /// Optional config file path (defaults to svn-commit-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Files to scan.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Exit status for rejected commits and failed checks.
const EXIT_REJECTED: u8 = 1;
/// Exit status for configuration and usage errors.
const EXIT_CONFIG: u8 = 2;

/// CLI error carrying the message and exit status to report.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
    /// Process exit status.
    status: u8,
}

impl CliError {
    /// Constructs an error for a rejected commit or failed check.
    const fn rejected(message: String) -> Self {
        Self {
            message,
            status: EXIT_REJECTED,
        }
    }

    /// Constructs an error for unusable configuration or input.
    const fn config(message: String) -> Self {
        Self {
            message,
            status: EXIT_CONFIG,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string())
    }
}

impl From<GateError> for CliError {
    fn from(error: GateError) -> Self {
        Self::rejected(error.to_string())
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(err) => emit_error(&err),
    }
}

/// Executes the CLI command dispatcher.
fn run(command: Commands) -> CliResult<ExitCode> {
    match command {
        Commands::PreCommit(command) => command_pre_commit(&command),
        Commands::Config {
            command: ConfigCommand::Validate(command),
        } => command_config_validate(&command),
        Commands::Tags {
            command: TagsCommand::Check(command),
        } => command_tags_check(&command),
        Commands::Collision {
            command: CollisionCommand::Scan(command),
        } => command_collision_scan(&command),
    }
}

// ============================================================================
// SECTION: Pre-Commit Command
// ============================================================================

/// Executes the `pre-commit` hook command.
fn command_pre_commit(command: &PreCommitCommand) -> CliResult<ExitCode> {
    let config = GateConfig::load(command.config.as_deref())?;
    let registry = config.registry()?;
    let validator = config.reference_validator()?;
    let detector = config.collision_detector()?;
    let diagnostics = config.best_effort_diagnostic_sink();

    let invocation = HookInvocation::new(&command.repository, command.transaction.as_str());
    let gate = CommitGate::open(
        &invocation,
        &registry,
        config.svnlook(),
        registry.clone(),
        detector,
        diagnostics,
    )?;
    gate.assert_commit_message_is_valid(&validator)?;
    gate.assert_commit_to_tag_is_allowed()?;
    gate.assert_commit_does_not_contain_known_collision()?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = GateConfig::load(command.config.as_deref())?;
    config.diagnostic_sink()?;
    write_stdout_line(&format!(
        "config ok: {} repositories, {} collision signatures",
        config.repositories.len(),
        config.signature_set()?.len()
    ))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Tags Commands
// ============================================================================

/// Executes `tags check`, printing one verdict per changed-path line.
fn command_tags_check(command: &TagsCheckCommand) -> CliResult<ExitCode> {
    let config = ImmutableTagConfiguration::new(
        join_lines(&command.paths),
        join_lines(&command.whitelist),
    );
    let policy = TagPolicy::compile(&config)
        .map_err(|err| CliError::config(format!("invalid tag pattern: {err}")))?;
    let changes = command
        .lines
        .iter()
        .map(|line| {
            ChangedPath::parse(line)
                .map_err(|err| CliError::config(format!("invalid changed path line: {err}")))
        })
        .collect::<CliResult<Vec<_>>>()?;

    let mut denied = false;
    for change in &changes {
        let decision = policy.as_ref().map_or(TagDecision::Unprotected, |policy| {
            policy.evaluate(change)
        });
        denied |= !decision.is_allowed();
        write_stdout_line(&verdict_line(change, &decision))?;
    }
    Ok(if denied { ExitCode::from(EXIT_REJECTED) } else { ExitCode::SUCCESS })
}

/// Joins repeated pattern arguments into one newline-separated block.
fn join_lines(values: &[String]) -> String {
    values.join("\n")
}

/// Formats the verdict for one changed path.
fn verdict_line(change: &ChangedPath, decision: &TagDecision) -> String {
    match decision {
        TagDecision::Unprotected => format!("allowed      {change}"),
        TagDecision::Whitelisted {
            whitelist,
            ..
        } => format!("whitelisted  {change}  ({whitelist})"),
        TagDecision::Denied {
            immutable,
        } => format!("denied       {change}  ({immutable})"),
    }
}

// ============================================================================
// SECTION: Collision Commands
// ============================================================================

/// Executes `collision scan` over local files.
fn command_collision_scan(command: &CollisionScanCommand) -> CliResult<ExitCode> {
    let config = GateConfig::load(command.config.as_deref())?;
    let detector = config.collision_detector()?;

    let mut flagged = false;
    for path in &command.files {
        let mut file = File::open(path).map_err(|err| read_error(path, &err))?;
        let found = detector.scan(&mut file).map_err(|err| read_error(path, &err))?;
        match found {
            Some(signature) => {
                flagged = true;
                write_stdout_line(&format!(
                    "collision    {}  ({}, {})",
                    path.display(),
                    signature.label,
                    signature.digest
                ))?;
            }
            None => write_stdout_line(&format!("clean        {}", path.display()))?,
        }
    }
    Ok(if flagged { ExitCode::from(EXIT_REJECTED) } else { ExitCode::SUCCESS })
}

/// Formats a local file read failure.
fn read_error(path: &Path, error: &std::io::Error) -> CliError {
    CliError::rejected(format!("can't read {}: {error}", path.display()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::config(format!("failed to write to stdout: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns its exit code.
fn emit_error(error: &CliError) -> ExitCode {
    let _ = write_stderr_line(&error.message);
    ExitCode::from(error.status)
}
