// crates/mcp-env-validation/src/lib.rs
// ============================================================================
// Module: MCP Env Validation Library
// Description: Startup configuration requirements and fail-closed validation.
// Purpose: Single source of truth for MCP server environment semantics.
// Dependencies: dotenvy, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `mcp-env-validation` lets an MCP server declare the configuration it needs
//! as a [`RequirementSet`], resolve it against a [`ConfigSource`] once at
//! startup, and either obtain a [`ResolvedConfig`] or a single aggregated
//! [`ConfigurationError`] that tells the operator exactly what is missing.
//!
//! It also provides the uniform error payloads ([`AuthErrorResponse`],
//! [`ConfigErrorResponse`]) that tool handlers return when upstream
//! credentials are rejected.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use mcp_env_validation::Requirement;
//! use mcp_env_validation::RequirementSet;
//! use mcp_env_validation::validate;
//!
//! let requirements: RequirementSet =
//!     [Requirement::optional("PORT", "Listen port").with_default("5000")].into_iter().collect();
//! let source: BTreeMap<String, String> = BTreeMap::new();
//! let resolved = validate("Demo", &requirements, &source)?;
//! assert_eq!(resolved.get("PORT"), Some("5000"));
//! # Ok::<(), mcp_env_validation::ConfigurationError>(())
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod common;
pub mod error;
pub mod message;
pub mod requirement;
pub mod responses;
pub mod source;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use common::DEFAULT_LOG_LEVEL;
pub use common::DEFAULT_PORT;
pub use common::LOG_LEVEL_VAR;
pub use common::PORT_VAR;
pub use common::common_requirements;
pub use error::ConfigurationError;
pub use requirement::Requirement;
pub use requirement::RequirementLevel;
pub use requirement::RequirementSet;
pub use responses::AuthErrorResponse;
pub use responses::ConfigErrorResponse;
pub use responses::ErrorKind;
pub use responses::Troubleshooting;
pub use responses::auth_error_response;
pub use responses::config_error_response;
pub use source::ConfigSource;
pub use source::DotenvFile;
pub use source::LayeredSource;
pub use source::ProcessEnv;
pub use source::SourceError;
pub use validator::ResolvedConfig;
pub use validator::validate;
pub use validator::validate_env;
