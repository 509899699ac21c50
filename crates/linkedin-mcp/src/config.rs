// crates/linkedin-mcp/src/config.rs
// ============================================================================
// Module: LinkedIn Server Settings
// Description: Startup requirements and typed settings for the server.
// Purpose: Turn validated configuration into listen and logging settings.
// Dependencies: mcp-env-validation, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`linkedin_requirements`] declares what the server needs before it may
//! start. [`resolve_settings`] validates a configuration source against it and
//! converts the resolved strings into [`ServerSettings`]. Command-line values
//! arrive as [`SettingsOverrides`] and win over the source.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use mcp_env_validation::ConfigSource;
use mcp_env_validation::ConfigurationError;
use mcp_env_validation::LOG_LEVEL_VAR;
use mcp_env_validation::PORT_VAR;
use mcp_env_validation::Requirement;
use mcp_env_validation::RequirementSet;
use mcp_env_validation::ResolvedConfig;
use mcp_env_validation::common_requirements;
use mcp_env_validation::validate;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Service name used in configuration and auth error payloads.
pub const SERVICE_NAME: &str = "LinkedIn";
/// Environment key holding the LinkedIn access token.
pub const ACCESS_TOKEN_VAR: &str = "LINKEDIN_ACCESS_TOKEN";
/// Developer portal where access tokens are created.
pub const TOKEN_SETUP_URL: &str = "https://www.linkedin.com/developers/apps";
/// OAuth scopes the token must carry.
pub const TOKEN_PERMISSIONS: [&str; 3] = ["r_liteprofile", "r_emailaddress", "w_member_social"];

// ============================================================================
// SECTION: Requirements
// ============================================================================

/// Returns the LinkedIn server requirements merged with the common set.
#[must_use]
pub fn linkedin_requirements() -> RequirementSet {
    let linkedin: RequirementSet = [Requirement::required(
        ACCESS_TOKEN_VAR,
        "LinkedIn access token for API authentication",
    )
    .with_setup_url(TOKEN_SETUP_URL)
    .with_permissions(TOKEN_PERMISSIONS)]
    .into_iter()
    .collect();
    linkedin.merged(common_requirements())
}

// ============================================================================
// SECTION: Log Level
// ============================================================================

/// Log level names accepted from flags and the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    /// Verbose diagnostics.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Recoverable problems.
    Warning,
    /// Failures.
    Error,
    /// Fatal failures; logged at the error level.
    Critical,
}

impl LogLevel {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Maps the level onto a tracing filter.
    #[must_use]
    pub const fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(SettingsError::InvalidLogLevel(value.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Values supplied on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Listen port override.
    pub port: Option<u16>,
    /// Log level override.
    pub log_level: Option<LogLevel>,
}

/// Typed settings the server runs with.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Configured LinkedIn access token.
    pub access_token: String,
    /// Listen port.
    pub port: u16,
    /// Log level.
    pub log_level: LogLevel,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("access_token", &"<redacted>")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ServerSettings {
    /// Builds settings from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a value cannot be converted.
    pub fn from_resolved(resolved: &ResolvedConfig) -> Result<Self, SettingsError> {
        Self::from_resolved_with(resolved, SettingsOverrides::default())
    }

    /// Builds settings from a resolved configuration, preferring `overrides`.
    ///
    /// Overridden fields are not parsed from `resolved`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a non-overridden value cannot be converted.
    pub fn from_resolved_with(
        resolved: &ResolvedConfig,
        overrides: SettingsOverrides,
    ) -> Result<Self, SettingsError> {
        let access_token = resolved
            .get(ACCESS_TOKEN_VAR)
            .map(str::to_string)
            .ok_or(SettingsError::Missing(ACCESS_TOKEN_VAR))?;
        let port = match overrides.port {
            Some(port) => port,
            None => parse_port(resolved.get(PORT_VAR).ok_or(SettingsError::Missing(PORT_VAR))?)?,
        };
        let log_level = match overrides.log_level {
            Some(level) => level,
            None => resolved
                .get(LOG_LEVEL_VAR)
                .ok_or(SettingsError::Missing(LOG_LEVEL_VAR))?
                .parse()?,
        };
        Ok(Self {
            access_token,
            port,
            log_level,
        })
    }
}

/// Parses a listen port; zero is rejected.
fn parse_port(value: &str) -> Result<u16, SettingsError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(SettingsError::InvalidPort(value.to_string())),
    }
}

/// Validates `source` and converts it into [`ServerSettings`].
///
/// # Errors
///
/// Returns [`StartupError::Configuration`] when requirements are missing and
/// [`StartupError::Settings`] when a resolved value is malformed.
pub fn resolve_settings<S: ConfigSource + ?Sized>(
    source: &S,
    overrides: SettingsOverrides,
) -> Result<ServerSettings, StartupError> {
    let resolved = validate(SERVICE_NAME, &linkedin_requirements(), source)?;
    Ok(ServerSettings::from_resolved_with(&resolved, overrides)?)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Resolved values that cannot be converted into settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A value expected after validation is absent.
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    /// Port is not a number in 1..=65535.
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
    /// Log level name is not recognized.
    #[error("invalid LOG_LEVEL value: {0:?} (expected DEBUG, INFO, WARNING, ERROR, CRITICAL)")]
    InvalidLogLevel(String),
}

/// Startup failures before the server binds.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Declared requirements are unsatisfied.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Resolved values are malformed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
