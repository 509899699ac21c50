// crates/linkedin-mcp-cli/src/main.rs
// ============================================================================
// Module: LinkedIn MCP CLI Entry Point
// Description: Command dispatcher for the LinkedIn MCP server.
// Purpose: Validate startup configuration, then serve both transports.
// Dependencies: clap, linkedin-mcp, mcp-env-validation, thiserror, tokio.
// ============================================================================

//! ## Overview
//! Startup runs in a fixed order: parse flags, layer the process environment
//! over `.env`, install logging, validate settings, then serve. A
//! configuration failure is logged and the process exits non-zero before any
//! listener is bound.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use linkedin_mcp::LinkedInClient;
use linkedin_mcp::LinkedInConfig;
use linkedin_mcp::LogLevel;
use linkedin_mcp::McpServer;
use linkedin_mcp::ServerOptions;
use linkedin_mcp::ServerSettings;
use linkedin_mcp::SettingsOverrides;
use linkedin_mcp::ToolRouter;
use linkedin_mcp::resolve_settings;
use linkedin_mcp_cli::init_tracing;
use linkedin_mcp_cli::load_config_source;
use linkedin_mcp_cli::resolve_log_level;
use mcp_env_validation::ConfigSource;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Definitions
// ============================================================================

/// LinkedIn MCP server command line.
#[derive(Parser, Debug)]
#[command(name = "linkedin-mcp-server", version, about = "LinkedIn MCP server")]
struct Cli {
    /// Listen port; overrides `PORT`.
    #[arg(long, global = true, value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
    /// Log level; overrides `LOG_LEVEL`.
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
    /// Answer `/mcp` requests with plain JSON instead of an SSE stream.
    #[arg(long = "json-response", global = true, action = ArgAction::SetTrue)]
    json_response: bool,
    /// Explicit `.env` file; defaults to discovery from the working directory.
    #[arg(long = "env-file", global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,
    /// Command to run; `serve` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Validate configuration and run the server.
    Serve,
    /// Validate configuration and exit.
    CheckConfig,
}

impl Cli {
    /// Returns the selected command.
    fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Returns the flag overrides applied on top of the environment.
    const fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            port: self.port,
            log_level: self.log_level,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
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
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Runs startup and dispatches the command.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    let source = load_config_source(cli.env_file.as_deref())
        .map_err(|err| CliError::new(format!("failed to load configuration: {err}")))?;
    init_tracing(resolve_log_level(cli.log_level, &source))
        .map_err(|err| CliError::new(err.to_string()))?;

    let settings = match validate_startup(&source, cli.overrides()) {
        Ok(settings) => settings,
        Err(code) => return Ok(code),
    };

    match cli.selected_command() {
        Commands::Serve => command_serve(settings, cli.json_response).await,
        Commands::CheckConfig => command_check_config(&settings),
    }
}

/// Validates settings, logging the failure and mapping it to an exit code.
fn validate_startup<S: ConfigSource + ?Sized>(
    source: &S,
    overrides: SettingsOverrides,
) -> Result<ServerSettings, ExitCode> {
    match resolve_settings(source, overrides) {
        Ok(settings) => {
            tracing::debug!(?settings, "configuration validated");
            Ok(settings)
        }
        Err(err) => {
            tracing::error!("{err}");
            Err(ExitCode::FAILURE)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(settings: ServerSettings, json_response: bool) -> CliResult<ExitCode> {
    let client = LinkedInClient::new(LinkedInConfig::default())
        .map_err(|err| CliError::new(format!("failed to build LinkedIn client: {err}")))?;
    let router = ToolRouter::new(client, settings.access_token);
    let server = McpServer::new(router, ServerOptions::new(settings.port, json_response));
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `check-config` command.
fn command_check_config(settings: &ServerSettings) -> CliResult<ExitCode> {
    write_stdout_line(&check_config_summary(settings))
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Summary line printed by `check-config`; never includes the token.
fn check_config_summary(settings: &ServerSettings) -> String {
    format!(
        "LinkedIn configuration OK (port {}, log level {})",
        settings.port, settings.log_level
    )
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes an error to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
