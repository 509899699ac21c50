// crates/linkedin-mcp-cli/src/startup.rs
// ============================================================================
// Module: CLI Startup Source
// Description: Process environment layered over a `.env` file.
// Purpose: Give validation a single source with environment precedence.
// Dependencies: mcp-env-validation
// ============================================================================

//! ## Overview
//! [`load_config_source`] returns a [`ConfigLayers`] where a variable set in
//! the process environment always wins over the same key in `.env`. The
//! process environment is never modified.

use std::path::Path;

use mcp_env_validation::DotenvFile;
use mcp_env_validation::LayeredSource;
use mcp_env_validation::ProcessEnv;
use mcp_env_validation::SourceError;

/// Environment first, `.env` second.
pub type ConfigLayers = LayeredSource<ProcessEnv, DotenvFile>;

/// Builds the configuration source.
///
/// An explicit `env_file` must exist; otherwise a `.env` is discovered from
/// the working directory upward and its absence is not an error.
///
/// # Errors
///
/// Returns [`SourceError`] when the file cannot be read or parsed.
pub fn load_config_source(env_file: Option<&Path>) -> Result<ConfigLayers, SourceError> {
    let dotenv = match env_file {
        Some(path) => DotenvFile::load(path)?,
        None => DotenvFile::discover()?,
    };
    if let Some(path) = dotenv.path() {
        tracing::debug!(path = %path.display(), entries = dotenv.len(), "loaded dotenv file");
    }
    Ok(LayeredSource::new(ProcessEnv, dotenv))
}
