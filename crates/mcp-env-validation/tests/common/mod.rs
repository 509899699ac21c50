// crates/mcp-env-validation/tests/common/mod.rs
// =============================================================================
// Module: Validation Test Helpers
// Description: Shared helpers for validator integration tests.
// Purpose: Reduce duplication across mcp-env-validation test suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;

use mcp_env_validation::ConfigurationError;
use mcp_env_validation::ResolvedConfig;

/// Builds an in-memory source from key/value pairs.
pub fn source(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

/// Returns the empty in-memory source.
pub fn empty_source() -> BTreeMap<String, String> {
    BTreeMap::new()
}

/// Unwraps a validation failure or reports the unexpected success.
pub fn expect_failure(
    result: Result<ResolvedConfig, ConfigurationError>,
) -> Result<ConfigurationError, String> {
    match result {
        Ok(resolved) => Err(format!("expected configuration error, got {resolved:?}")),
        Err(error) => Ok(error),
    }
}

/// Names of the requirements in a missing list.
pub fn names(requirements: &[mcp_env_validation::Requirement]) -> Vec<String> {
    requirements.iter().map(|requirement| requirement.name.clone()).collect()
}
