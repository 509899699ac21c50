// crates/mcp-env-validation/tests/sources.rs
// =============================================================================
// Module: Config Source Tests
// Description: Layering, dotenv parsing, and process environment lookups.
// Purpose: Ensure the environment wins over .env overlays.
// =============================================================================

//! ## Overview
//! Configuration source tests for mcp-env-validation.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and assertions are permitted."
)]

use std::fs;

use mcp_env_validation::ConfigSource;
use mcp_env_validation::DotenvFile;
use mcp_env_validation::LayeredSource;
use mcp_env_validation::ProcessEnv;
use mcp_env_validation::Requirement;
use mcp_env_validation::RequirementSet;
use mcp_env_validation::validate;

mod common;

type TestResult = Result<(), String>;

fn write_dotenv(contents: &str) -> Result<(tempfile::TempDir, std::path::PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join(".env");
    fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

#[test]
fn primary_wins_over_fallback() -> TestResult {
    let layered = LayeredSource::new(
        common::source(&[("TOKEN", "from-env")]),
        common::source(&[("TOKEN", "from-file"), ("PORT", "7000")]),
    );
    if layered.lookup("TOKEN").as_deref() != Some("from-env") {
        return Err("primary source must win".to_string());
    }
    if layered.lookup("PORT").as_deref() != Some("7000") {
        return Err("fallback must fill gaps".to_string());
    }
    Ok(())
}

#[test]
fn blank_primary_defers_to_fallback() -> TestResult {
    let layered = LayeredSource::new(
        common::source(&[("TOKEN", "")]),
        common::source(&[("TOKEN", "from-file")]),
    );
    if layered.lookup("TOKEN").as_deref() != Some("from-file") {
        return Err("blank primary value must defer to fallback".to_string());
    }
    Ok(())
}

#[test]
fn dotenv_file_parses_pairs() -> TestResult {
    let (_dir, path) = write_dotenv("# comment\nLINKEDIN_ACCESS_TOKEN=abc123\nPORT=\"6001\"\n")?;
    let dotenv = DotenvFile::load(&path).map_err(|err| err.to_string())?;
    if dotenv.lookup("LINKEDIN_ACCESS_TOKEN").as_deref() != Some("abc123") {
        return Err(format!("unexpected token: {dotenv:?}"));
    }
    if dotenv.lookup("PORT").as_deref() != Some("6001") {
        return Err(format!("unexpected port: {dotenv:?}"));
    }
    if dotenv.len() != 2 || dotenv.path() != Some(path.as_path()) {
        return Err(format!("unexpected file metadata: {dotenv:?}"));
    }
    Ok(())
}

#[test]
fn dotenv_missing_file_is_an_error_when_explicit() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let result = DotenvFile::load(&dir.path().join("absent.env"));
    if result.is_ok() {
        return Err("explicit missing file must fail".to_string());
    }
    Ok(())
}

#[test]
fn dotenv_discovery_walks_up_and_records_path() -> TestResult {
    let (dir, path) = write_dotenv("PORT=7001\n")?;
    let nested = dir.path().join("a").join("b");
    fs::create_dir_all(&nested).map_err(|err| err.to_string())?;
    let dotenv = DotenvFile::discover_from(&nested).map_err(|err| err.to_string())?;
    if dotenv.path() != Some(path.as_path()) || dotenv.lookup("PORT").as_deref() != Some("7001") {
        return Err(format!("parent .env not discovered: {dotenv:?}"));
    }

    let inner = dir.path().join("a").join(".env");
    fs::write(&inner, "PORT=7002\n").map_err(|err| err.to_string())?;
    let dotenv = DotenvFile::discover_from(&nested).map_err(|err| err.to_string())?;
    if dotenv.path() != Some(inner.as_path()) || dotenv.lookup("PORT").as_deref() != Some("7002") {
        return Err(format!("nearest .env must win: {dotenv:?}"));
    }
    Ok(())
}

#[test]
fn dotenv_overlay_satisfies_requirements() -> TestResult {
    let (_dir, path) = write_dotenv("TOKEN=from-file\n")?;
    let dotenv = DotenvFile::load(&path).map_err(|err| err.to_string())?;
    let requirements: RequirementSet =
        [Requirement::required("TOKEN", "token")].into_iter().collect();
    let layered = LayeredSource::new(common::empty_source(), dotenv);
    let resolved = validate("svc", &requirements, &layered).map_err(|err| err.to_string())?;
    if resolved.get("TOKEN") != Some("from-file") {
        return Err(format!("unexpected resolution: {resolved:?}"));
    }
    Ok(())
}

#[test]
fn process_env_reports_unset_variable_as_absent() -> TestResult {
    if ProcessEnv.lookup("MCP_ENV_VALIDATION_SURELY_UNSET_VARIABLE").is_some() {
        return Err("unset variable must be absent".to_string());
    }
    Ok(())
}

#[test]
fn borrowed_sources_delegate() -> TestResult {
    let map = common::source(&[("A", "1")]);
    let borrowed: &dyn ConfigSource = &map;
    if borrowed.lookup_present("A").as_deref() != Some("1") {
        return Err("borrowed source must delegate".to_string());
    }
    Ok(())
}
