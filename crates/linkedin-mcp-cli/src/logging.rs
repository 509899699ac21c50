// crates/linkedin-mcp-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Log level selection and tracing subscriber installation.
// Purpose: Route server logs to stderr at the configured level.
// Dependencies: tracing-subscriber, linkedin-mcp
// ============================================================================

//! ## Overview
//! Precedence is `--log-level`, then `LOG_LEVEL` from the configuration
//! source, then `INFO`. An unparsable `LOG_LEVEL` is ignored here; settings
//! validation reports it afterwards. `RUST_LOG` directives, when set, refine
//! the default.

use linkedin_mcp::LogLevel;
use mcp_env_validation::ConfigSource;
use mcp_env_validation::LOG_LEVEL_VAR;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Picks the level used to install logging.
#[must_use]
pub fn resolve_log_level<S: ConfigSource + ?Sized>(flag: Option<LogLevel>, source: &S) -> LogLevel {
    flag.or_else(|| {
        source.lookup_present(LOG_LEVEL_VAR).and_then(|value| value.parse::<LogLevel>().ok())
    })
    .unwrap_or_default()
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::Init`] when a global subscriber is already set.
pub fn init_tracing(level: LogLevel) -> Result<(), LoggingError> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))
}

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Init(String),
}
