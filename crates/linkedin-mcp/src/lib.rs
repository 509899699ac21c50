// crates/linkedin-mcp/src/lib.rs
// ============================================================================
// Module: LinkedIn MCP
// Description: LinkedIn tools exposed through an MCP server.
// Purpose: Post, share, and profile operations for MCP clients.
// Dependencies: mcp-env-validation, axum, reqwest, tokio
// ============================================================================

//! ## Overview
//! `linkedin-mcp` declares the server's startup requirements, wraps the
//! LinkedIn REST API in [`LinkedInClient`], routes MCP tool calls through
//! [`ToolRouter`], and serves them over SSE and streamable HTTP with
//! [`McpServer`]. Credentials never live in ambient state: each request carries
//! an explicit [`RequestContext`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod config;
pub mod format;
pub mod linkedin;
pub mod server;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::RequestContext;
pub use auth::Transport;
pub use config::LogLevel;
pub use config::ServerSettings;
pub use config::SettingsError;
pub use config::SettingsOverrides;
pub use config::StartupError;
pub use config::linkedin_requirements;
pub use config::resolve_settings;
pub use format::RichPostRequest;
pub use format::RichPostResult;
pub use format::format_rich_post;
pub use linkedin::LinkedInClient;
pub use linkedin::LinkedInConfig;
pub use linkedin::LinkedInError;
pub use linkedin::Visibility;
pub use server::McpServer;
pub use server::McpServerError;
pub use server::ServerOptions;
pub use tools::ToolName;
pub use tools::ToolOutput;
pub use tools::ToolRouter;
