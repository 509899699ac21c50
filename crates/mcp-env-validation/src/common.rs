// crates/mcp-env-validation/src/common.rs
// ============================================================================
// Module: Common Requirements
// Description: Requirements shared by every MCP server in the family.
// Purpose: Keep listen port and log level declarations in one place.
// Dependencies: crate::requirement
// ============================================================================

//! ## Overview
//! Every server accepts `PORT` and `LOG_LEVEL`. Service crates merge
//! [`common_requirements`] into their own set so the shared entries resolve
//! identically everywhere.

use crate::requirement::Requirement;
use crate::requirement::RequirementSet;

/// Environment key for the listen port.
pub const PORT_VAR: &str = "PORT";
/// Environment key for the log level.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
/// Listen port used when `PORT` is unset.
pub const DEFAULT_PORT: &str = "5000";
/// Log level used when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Returns the requirements shared by all servers.
#[must_use]
pub fn common_requirements() -> RequirementSet {
    [
        Requirement::optional(PORT_VAR, "Port for the MCP server to listen on")
            .with_default(DEFAULT_PORT),
        Requirement::optional(LOG_LEVEL_VAR, "Logging level (DEBUG, INFO, WARNING, ERROR)")
            .with_default(DEFAULT_LOG_LEVEL),
    ]
    .into_iter()
    .collect()
}
