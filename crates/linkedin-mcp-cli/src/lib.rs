// crates/linkedin-mcp-cli/src/lib.rs
// ============================================================================
// Module: LinkedIn MCP CLI Library
// Description: Startup helpers shared by the CLI binary and its tests.
// Purpose: Build the configuration source and install logging.
// Dependencies: mcp-env-validation, linkedin-mcp, tracing-subscriber
// ============================================================================

//! ## Overview
//! The binary layers the process environment over an optional `.env` file,
//! picks a log level before validation runs so failures are logged at the
//! requested verbosity, then hands the source to
//! [`linkedin_mcp::resolve_settings`].

pub mod logging;
pub mod startup;

pub use logging::LoggingError;
pub use logging::init_tracing;
pub use logging::resolve_log_level;
pub use startup::ConfigLayers;
pub use startup::load_config_source;
