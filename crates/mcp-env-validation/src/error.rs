// crates/mcp-env-validation/src/error.rs
// ============================================================================
// Module: Configuration Error
// Description: Aggregated startup validation failure.
// Purpose: Carry every missing requirement plus the operator-facing message.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ConfigurationError`] is the only failure the validator produces. It is
//! fatal at startup: callers log [`ConfigurationError::message`] and exit
//! before binding any listener.

use thiserror::Error;

use crate::message::render_error_message;
use crate::requirement::Requirement;
use crate::responses::ConfigErrorResponse;
use crate::responses::config_error_response;

/// One or more declared requirements could not be satisfied.
///
/// # Invariants
/// - At least one of the missing lists is non-empty.
/// - Lists preserve requirement declaration order.
/// - `message` is derived from the lists and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    /// Service the requirements belong to.
    service_name: String,
    /// Required entries that did not resolve.
    missing_required: Vec<Requirement>,
    /// Conditional entries whose dependency was present but which did not resolve.
    missing_conditional: Vec<Requirement>,
    /// Rendered operator message.
    message: String,
}

impl ConfigurationError {
    /// Builds the error and renders its message.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        missing_required: Vec<Requirement>,
        missing_conditional: Vec<Requirement>,
    ) -> Self {
        let service_name = service_name.into();
        let message = render_error_message(&service_name, &missing_required, &missing_conditional);
        Self {
            service_name,
            missing_required,
            missing_conditional,
            message,
        }
    }

    /// Service the failure belongs to.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Required entries that did not resolve.
    #[must_use]
    pub fn missing_required(&self) -> &[Requirement] {
        &self.missing_required
    }

    /// Conditional entries that did not resolve.
    #[must_use]
    pub fn missing_conditional(&self) -> &[Requirement] {
        &self.missing_conditional
    }

    /// Names of every missing entry, required first.
    #[must_use]
    pub fn missing_names(&self) -> Vec<&str> {
        self.missing_required
            .iter()
            .chain(&self.missing_conditional)
            .map(|requirement| requirement.name.as_str())
            .collect()
    }

    /// Rendered operator message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Converts the failure into the shared configuration error payload.
    #[must_use]
    pub fn to_response(&self) -> ConfigErrorResponse {
        config_error_response(&self.service_name, &self.missing_names())
    }
}
