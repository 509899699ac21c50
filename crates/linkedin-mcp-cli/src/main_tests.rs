// crates/linkedin-mcp-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Tests
// Description: Flag parsing and command selection for the CLI entry point.
// Purpose: Keep the command surface stable.
// Dependencies: clap
// ============================================================================

//! ## Overview
//! Parses argument vectors with `Cli::try_parse_from` and runs startup
//! validation against in-memory sources.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::path::Path;

use clap::CommandFactory;
use clap::Parser;
use linkedin_mcp::LogLevel;
use linkedin_mcp::ServerSettings;
use linkedin_mcp::SettingsOverrides;

use super::Cli;
use super::Commands;
use super::check_config_summary;
use super::validate_startup;

fn source(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn defaults_to_serve_without_overrides() {
    let cli = Cli::try_parse_from(["linkedin-mcp-server"]).unwrap();
    assert_eq!(cli.selected_command(), Commands::Serve);
    let overrides = cli.overrides();
    assert_eq!(overrides.port, None);
    assert_eq!(overrides.log_level, None);
    assert!(!cli.json_response);
    assert!(cli.env_file.is_none());
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "linkedin-mcp-server",
        "check-config",
        "--port",
        "8080",
        "--log-level",
        "debug",
        "--env-file",
        "/tmp/linkedin.env",
    ])
    .unwrap();
    assert_eq!(cli.selected_command(), Commands::CheckConfig);
    assert_eq!(cli.overrides().port, Some(8080));
    assert_eq!(cli.overrides().log_level, Some(LogLevel::Debug));
    assert_eq!(cli.env_file.as_deref(), Some(Path::new("/tmp/linkedin.env")));
}

#[test]
fn json_response_flag_is_boolean() {
    let cli = Cli::try_parse_from(["linkedin-mcp-server", "serve", "--json-response"]).unwrap();
    assert_eq!(cli.selected_command(), Commands::Serve);
    assert!(cli.json_response);
}

#[test]
fn rejects_port_zero() {
    assert!(Cli::try_parse_from(["linkedin-mcp-server", "--port", "0"]).is_err());
}

#[test]
fn rejects_unknown_log_level() {
    assert!(Cli::try_parse_from(["linkedin-mcp-server", "--log-level", "verbose"]).is_err());
}

#[test]
fn check_config_summary_omits_token() {
    let settings = ServerSettings {
        access_token: "secret-token".to_string(),
        port: 5000,
        log_level: LogLevel::Warning,
    };
    let summary = check_config_summary(&settings);
    assert_eq!(summary, "LinkedIn configuration OK (port 5000, log level WARNING)");
    assert!(!summary.contains("secret-token"));
}

#[test]
fn missing_token_fails_startup() {
    let result = validate_startup(&source(&[("PORT", "8080")]), SettingsOverrides::default());
    assert!(result.is_err());
}

#[test]
fn invalid_port_fails_startup() {
    let env = source(&[("LINKEDIN_ACCESS_TOKEN", "token"), ("PORT", "http")]);
    assert!(validate_startup(&env, SettingsOverrides::default()).is_err());
}

#[test]
fn flag_overrides_apply_to_validated_settings() {
    let cli = Cli::try_parse_from(["linkedin-mcp-server", "--port", "9100", "--log-level", "ERROR"])
        .unwrap();
    let env = source(&[("LINKEDIN_ACCESS_TOKEN", "token"), ("PORT", "not-a-port")]);
    let settings = validate_startup(&env, cli.overrides()).unwrap();
    assert_eq!(settings.port, 9100);
    assert_eq!(settings.log_level, LogLevel::Error);
    assert_eq!(settings.access_token, "token");
}
