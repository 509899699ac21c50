// crates/mcp-env-validation/src/responses.rs
// ============================================================================
// Module: Shared Error Responses
// Description: Uniform auth and configuration failure payloads.
// Purpose: Let every tool in the family report failures with one shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Tool handlers return these payloads as structured tool output instead of
//! raising protocol errors, so a rejected credential never tears down the
//! client session. Field names are part of the wire contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Status code that classifies a response as an authentication failure.
pub const UNAUTHENTICATED_STATUS: u16 = 401;
/// Status code used for configuration failures.
pub const CONFIGURATION_STATUS: u16 = 500;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Error classification carried in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential missing, invalid, or expired.
    AuthenticationError,
    /// Credential valid but lacking permission.
    AuthorizationError,
    /// Server started without required configuration.
    ConfigurationError,
}

/// Operator hints attached to auth failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Troubleshooting {
    /// Token validity hint.
    pub check_token: String,
    /// Permission scope hint.
    pub check_permissions: String,
    /// Expiration hint.
    pub check_expiration: String,
}

/// Authentication or authorization failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Short error title.
    pub error: String,
    /// Upstream error details.
    pub message: String,
    /// HTTP-style status code.
    pub status_code: u16,
    /// Error classification.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Operator hints.
    pub troubleshooting: Troubleshooting,
}

/// Configuration failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Short error title.
    pub error: String,
    /// Summary naming the missing variables.
    pub message: String,
    /// Always 500.
    pub status_code: u16,
    /// Always [`ErrorKind::ConfigurationError`].
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Names of the missing variables.
    pub missing_variables: Vec<String>,
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds an auth failure payload.
///
/// A `401` status is classified as [`ErrorKind::AuthenticationError`]; any
/// other status as [`ErrorKind::AuthorizationError`].
#[must_use]
pub fn auth_error_response(service: &str, details: &str, status_code: u16) -> AuthErrorResponse {
    let kind = if status_code == UNAUTHENTICATED_STATUS {
        ErrorKind::AuthenticationError
    } else {
        ErrorKind::AuthorizationError
    };
    AuthErrorResponse {
        success: false,
        error: format!("{service} Authentication Error"),
        message: details.to_string(),
        status_code,
        kind,
        troubleshooting: Troubleshooting {
            check_token: format!("Verify your {service} access token is valid"),
            check_permissions: format!("Ensure your {service} token has required permissions"),
            check_expiration: format!("Check if your {service} token has expired"),
        },
    }
}

/// Builds a configuration failure payload.
#[must_use]
pub fn config_error_response<S: AsRef<str>>(
    service: &str,
    missing_vars: &[S],
) -> ConfigErrorResponse {
    let missing_variables: Vec<String> =
        missing_vars.iter().map(|name| name.as_ref().to_string()).collect();
    ConfigErrorResponse {
        success: false,
        error: format!("{service} Configuration Error"),
        message: format!(
            "Missing required environment variables: {}",
            missing_variables.join(", ")
        ),
        status_code: CONFIGURATION_STATUS,
        kind: ErrorKind::ConfigurationError,
        missing_variables,
    }
}

impl AuthErrorResponse {
    /// Builds a `401` authentication failure payload.
    #[must_use]
    pub fn unauthenticated(service: &str, details: &str) -> Self {
        auth_error_response(service, details, UNAUTHENTICATED_STATUS)
    }

    /// Renders the payload as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ConfigErrorResponse {
    /// Renders the payload as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
