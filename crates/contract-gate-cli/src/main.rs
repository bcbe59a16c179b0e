// crates/contract-gate-cli/src/main.rs
// ============================================================================
// Module: Contract Gate CLI Entry Point
// Description: Command dispatcher for contract verification runs.
// Purpose: Run the scenario catalog and expose config and contract utilities.
// Dependencies: clap, contract-gate-client, contract-gate-config, contract-gate-core
// ============================================================================

//! ## Overview
//! `contract-gate run` loads configuration, builds the HTTP client, registry,
//! and event sink, runs the built-in scenario catalog, and prints the report.
//! Exit codes: 0 when every scenario passed, 1 when any failed, 2 when the
//! harness could not run.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use contract_gate_cli::output::EXIT_HARNESS_ERROR;
use contract_gate_cli::output::OutputFormat;
use contract_gate_cli::output::render_report;
use contract_gate_cli::output::render_scenario_list;
use contract_gate_cli::output::suite_exit_code;
use contract_gate_client::HttpContractClient;
use contract_gate_config::EventSinkKind;
use contract_gate_config::HarnessConfig;
use contract_gate_core::PET_KIND;
use contract_gate_core::ResourceKind;
use contract_gate_core::SuiteRunner;
use contract_gate_core::runtime::petstore;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "contract-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scenario catalog against the configured service.
    Run(RunCommand),
    /// List the built-in scenarios.
    List,
    /// Contract utilities.
    Contract {
        /// Selected contract subcommand.
        #[command(subcommand)]
        command: ContractCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file path (defaults to `CONTRACT_GATE_CONFIG` or ./contract-gate.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Service base URL override.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Per-call timeout override in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
    /// Delete token override.
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
    /// Run only the named scenario (repeatable).
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
    /// Event sink override.
    #[arg(long, value_name = "SINK", value_parser = parse_sink)]
    events: Option<EventSinkKind>,
    /// Event log path for the file sink.
    #[arg(long, value_name = "PATH")]
    events_path: Option<PathBuf>,
}

/// Report formats accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    /// Human-readable lines.
    Text,
    /// One JSON document.
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Contract subcommands.
#[derive(Subcommand, Debug)]
enum ContractCommand {
    /// Print the JSON Schema of a registered contract.
    Export(ContractExportCommand),
}

/// Arguments for `contract export`.
#[derive(Args, Debug)]
struct ContractExportCommand {
    /// Resource kind to export.
    #[arg(long, value_name = "KIND", default_value = PET_KIND)]
    kind: String,
    /// Config file path; configured contracts are included.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate configuration.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying the message shown to the user.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
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
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("contract-gate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(command),
        Commands::List => command_list(),
        Commands::Contract {
            command: ContractCommand::Export(command),
        } => command_contract_export(&command),
        Commands::Config {
            command: ConfigCommand::Validate(command),
        } => command_config_validate(&command),
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes `run`.
fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = resolve_run_config(&command)?;
    let registry = config
        .build_registry()
        .map_err(|err| CliError::new(format!("failed to load contracts: {err}")))?;
    let sink = config
        .build_event_sink()
        .map_err(|err| CliError::new(format!("failed to open event sink: {err}")))?;
    let client = HttpContractClient::new(&config.client_config())
        .map_err(|err| CliError::new(format!("failed to build http client: {err}")))?;
    let scenarios = petstore::scenarios();
    let runner = SuiteRunner::new(&registry, &client, config.auth_token(), sink.as_ref());
    let report = runner
        .run_filtered(&scenarios, &command.scenarios)
        .map_err(|err| CliError::new(err.to_string()))?;
    let rendered = render_report(&report, command.format.into())
        .map_err(|err| CliError::new(format!("failed to render report: {err}")))?;
    write_stdout_text(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::from(suite_exit_code(&report)))
}

/// Loads configuration and layers command-line overrides on top.
fn resolve_run_config(command: &RunCommand) -> CliResult<HarnessConfig> {
    let mut config = HarnessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    if let Some(base_url) = &command.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = command.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(api_key) = &command.api_key {
        config.api_key.clone_from(api_key);
    }
    if let Some(sink) = command.events {
        config.events.sink = sink;
    }
    if let Some(path) = &command.events_path {
        config.events.path = Some(path.clone());
    }
    config.validate().map_err(|err| CliError::new(format!("invalid overrides: {err}")))?;
    Ok(config)
}

// ============================================================================
// SECTION: Utility Commands
// ============================================================================

/// Executes `list`.
fn command_list() -> CliResult<ExitCode> {
    let listing = render_scenario_list(&petstore::scenarios());
    write_stdout_text(&listing).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `contract export`.
fn command_contract_export(command: &ContractExportCommand) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let registry = config
        .build_registry()
        .map_err(|err| CliError::new(format!("failed to load contracts: {err}")))?;
    let kind = ResourceKind::new(command.kind.clone());
    let contract = registry
        .get(&kind)
        .ok_or_else(|| CliError::new(format!("no contract registered for kind `{kind}`")))?;
    let rendered = serde_json::to_string_pretty(&contract.to_json_schema())
        .map_err(|err| CliError::new(format!("failed to render contract: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    config
        .build_registry()
        .map_err(|err| CliError::new(format!("failed to load contracts: {err}")))?;
    let source = config
        .source
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |path| path.display().to_string());
    write_stdout_line(&format!("config ok: {source}"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses an event sink name.
fn parse_sink(value: &str) -> Result<EventSinkKind, String> {
    EventSinkKind::parse(value).ok_or_else(|| format!("unknown event sink `{value}`"))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes text to stdout, adding a trailing newline only when missing.
fn write_stdout_text(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns the harness-error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_HARNESS_ERROR)
}
