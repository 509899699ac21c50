// crates/linkedin-mcp-cli/tests/startup.rs
// =============================================================================
// Module: CLI Startup Tests
// Description: Log level precedence and configuration source loading.
// Purpose: Ensure flags beat the environment and explicit files must exist.
// =============================================================================

//! ## Overview
//! Startup helper tests for linkedin-mcp-cli.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and assertions are permitted."
)]

use std::collections::BTreeMap;
use std::fs;

use linkedin_mcp::LogLevel;
use linkedin_mcp::SettingsError;
use linkedin_mcp::SettingsOverrides;
use linkedin_mcp::StartupError;
use linkedin_mcp::resolve_settings;
use linkedin_mcp_cli::load_config_source;
use linkedin_mcp_cli::resolve_log_level;
use mcp_env_validation::ConfigSource;

fn source(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

#[test]
fn flag_wins_over_environment() {
    let env = source(&[("LOG_LEVEL", "ERROR")]);
    assert_eq!(resolve_log_level(Some(LogLevel::Debug), &env), LogLevel::Debug);
}

#[test]
fn environment_used_without_flag() {
    let env = source(&[("LOG_LEVEL", "warning")]);
    assert_eq!(resolve_log_level(None, &env), LogLevel::Warning);
}

#[test]
fn defaults_to_info() {
    assert_eq!(resolve_log_level(None, &source(&[])), LogLevel::Info);
    assert_eq!(resolve_log_level(None, &source(&[("LOG_LEVEL", "   ")])), LogLevel::Info);
}

#[test]
fn unparsable_environment_level_falls_back_to_info() {
    let env = source(&[("LINKEDIN_ACCESS_TOKEN", "token"), ("LOG_LEVEL", "chatty")]);
    assert_eq!(resolve_log_level(None, &env), LogLevel::Info);
    let err = resolve_settings(&env, SettingsOverrides::default()).unwrap_err();
    assert!(matches!(err, StartupError::Settings(SettingsError::InvalidLogLevel(_))));
}

#[test]
fn explicit_env_file_is_layered_under_process_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedin.env");
    fs::write(&path, "LINKEDIN_CLI_STARTUP_TEST_TOKEN=from-file\nPORT=7100\n").unwrap();

    let layers = load_config_source(Some(&path)).unwrap();
    assert_eq!(
        layers.lookup_present("LINKEDIN_CLI_STARTUP_TEST_TOKEN").as_deref(),
        Some("from-file")
    );
}

#[test]
fn missing_explicit_env_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.env");
    assert!(load_config_source(Some(&path)).is_err());
}
