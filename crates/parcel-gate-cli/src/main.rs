// crates/parcel-gate-cli/src/main.rs
// ============================================================================
// Module: Parcel Gate CLI Entry Point
// Description: Command dispatcher for the webhook server and config tooling.
// Purpose: Start the server or check a configuration file from the shell.
// Dependencies: clap, parcel-gate-config, parcel-gate-server, tokio, tracing
// ============================================================================

//! ## Overview
//! `parcel-gate serve` loads and validates configuration, builds the provider
//! and platform clients, then runs the webhook server on a multi-thread tokio
//! runtime. `parcel-gate config validate` performs the same load and reports
//! the outcome. Failures are written to stderr and exit non-zero.
//!
//! The server is built before the runtime starts: provider clients are
//! blocking and must not be constructed inside an async context.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use parcel_gate_config::ParcelGateConfig;
use parcel_gate_config::config_toml_example;
use parcel_gate_server::WebhookServer;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "PARCEL_GATE_LOG";
/// Log filter used when [`LOG_ENV`] is unset or blank.
const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "parcel-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to parcel-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
    /// Print an example configuration file.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to parcel-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures reported on stderr.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(String),
    /// Logging could not be installed.
    #[error("logging error: {0}")]
    Logging(String),
    /// The server failed to start or stopped with an error.
    #[error("serve error: {0}")]
    Serve(String),
    /// Writing to a standard stream failed.
    #[error("output error: {0}")]
    Output(String),
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Serve(command) => command_serve(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
fn command_serve(command: &ServeCommand) -> CliResult<ExitCode> {
    init_tracing(std::env::var(LOG_ENV).ok().as_deref(), command.log_json)?;
    let config = ParcelGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let server =
        WebhookServer::from_config(&config).map_err(|err| CliError::Serve(err.to_string()))?;
    info!(
        bind = %server.bind_addr(),
        provider = %config.provider.kind.as_str(),
        "starting parcel gate"
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::Serve(format!("runtime init failed: {err}")))?;
    runtime.block_on(server.serve()).map_err(|err| CliError::Serve(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Installs the global tracing subscriber.
fn init_tracing(directive: Option<&str>, json: bool) -> CliResult<()> {
    let filter = log_filter(directive)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if json { builder.json().try_init() } else { builder.try_init() };
    installed.map_err(|err| CliError::Logging(err.to_string()))
}

/// Parses a log filter directive, falling back to [`DEFAULT_LOG_FILTER`].
fn log_filter(directive: Option<&str>) -> CliResult<EnvFilter> {
    let directive = directive.map(str::trim).filter(|value| !value.is_empty());
    EnvFilter::try_new(directive.unwrap_or(DEFAULT_LOG_FILTER))
        .map_err(|err| CliError::Logging(format!("invalid {LOG_ENV}: {err}")))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
        ConfigCommand::Example => {
            write_stdout(&config_toml_example())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = ParcelGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    write_stdout("config ok\n")?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes text to stdout.
fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes()).map_err(|err| CliError::Output(err.to_string()))
}

/// Writes an error line to stderr and returns a failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "{message}");
    ExitCode::FAILURE
}
