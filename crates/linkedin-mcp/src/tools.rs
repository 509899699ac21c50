// crates/linkedin-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Tool catalog and dispatch for the LinkedIn MCP server.
// Purpose: Map MCP tool calls onto LinkedIn client operations.
// Dependencies: mcp-env-validation, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The router owns the tool catalog and turns each call into a
//! [`ToolOutput`]: a single text block plus an error flag. Tool failures never
//! become protocol errors. Rejected credentials are reported with the shared
//! auth error payload; other failures as `Error: <message>` text.
//!
//! ## Invariants
//! - Unknown tool names yield `Unknown tool: <name>`.
//! - A missing or empty `text`/`url` argument yields
//!   `Error: <param> parameter is required` without contacting LinkedIn.
//! - Successful results are pretty-printed JSON.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use mcp_env_validation::AuthErrorResponse;
use mcp_env_validation::auth_error_response;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::auth::RequestContext;
use crate::config::SERVICE_NAME;
use crate::format::RichPostRequest;
use crate::format::format_rich_post;
use crate::linkedin::LinkedInClient;
use crate::linkedin::LinkedInError;
use crate::linkedin::PostRequest;
use crate::linkedin::UrlShareRequest;
use crate::linkedin::Visibility;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Tools exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Fetch a profile.
    LinkedinGetProfileInfo,
    /// Publish a text post.
    LinkedinCreatePost,
    /// Format post text offline.
    LinkedinFormatRichPost,
    /// Share a URL.
    LinkedinCreateUrlShare,
}

impl ToolName {
    /// Every tool in catalog order.
    pub const ALL: [Self; 4] = [
        Self::LinkedinGetProfileInfo,
        Self::LinkedinCreatePost,
        Self::LinkedinFormatRichPost,
        Self::LinkedinCreateUrlShare,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinkedinGetProfileInfo => "linkedin_get_profile_info",
            Self::LinkedinCreatePost => "linkedin_create_post",
            Self::LinkedinFormatRichPost => "linkedin_format_rich_post",
            Self::LinkedinCreateUrlShare => "linkedin_create_url_share",
        }
    }

    /// Returns true when the tool calls the LinkedIn API.
    #[must_use]
    pub const fn needs_token(self) -> bool {
        !matches!(self, Self::LinkedinFormatRichPost)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| ToolError::UnknownTool(value.to_string()))
    }
}

// ============================================================================
// SECTION: Tool Catalog
// ============================================================================

/// Tool metadata advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: ToolName,
    /// Description for clients.
    pub description: String,
    /// JSON schema for the arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Returns the catalog in stable order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.into_iter().map(tool_definition).collect()
}

/// Builds the definition for one tool.
fn tool_definition(name: ToolName) -> ToolDefinition {
    let visibility = json!({
        "type": "string",
        "description": "Post visibility (PUBLIC, CONNECTIONS, LOGGED_IN_USERS).",
        "default": "PUBLIC"
    });
    let (description, input_schema) = match name {
        ToolName::LinkedinGetProfileInfo => (
            "Get LinkedIn profile information. If person_id is not provided, gets current user's \
             profile.",
            json!({
                "type": "object",
                "properties": {
                    "person_id": {
                        "type": "string",
                        "description": "The LinkedIn person ID to retrieve information for. Leave empty for current user."
                    }
                }
            }),
        ),
        ToolName::LinkedinCreatePost => (
            "Create a post on LinkedIn with optional title for article-style posts.",
            json!({
                "type": "object",
                "required": ["text"],
                "properties": {
                    "text": { "type": "string", "description": "The text content of the post." },
                    "title": {
                        "type": "string",
                        "description": "Optional title for article-style posts. When provided, creates an article format."
                    },
                    "hashtags": string_array("Optional list of hashtags to add to the post (# will be added automatically)."),
                    "visibility": visibility
                }
            }),
        ),
        ToolName::LinkedinFormatRichPost => (
            "Format rich text for LinkedIn posts with bold, italic, lists, mentions, and hashtags \
             (utility function - doesn't post).",
            json!({
                "type": "object",
                "required": ["text"],
                "properties": {
                    "text": { "type": "string", "description": "The base text content to format." },
                    "bold_text": string_array("Text phrases to make bold (will be wrapped with **)."),
                    "italic_text": string_array("Text phrases to make italic (will be wrapped with *)."),
                    "bullet_points": string_array("List of bullet points to add."),
                    "numbered_list": string_array("List of numbered items to add."),
                    "hashtags": string_array("List of hashtags to add."),
                    "mentions": string_array("List of usernames to mention (@ will be added automatically).")
                }
            }),
        ),
        ToolName::LinkedinCreateUrlShare => (
            "Share URLs with metadata preview on LinkedIn.",
            json!({
                "type": "object",
                "required": ["url", "text"],
                "properties": {
                    "url": { "type": "string", "description": "The URL to share (must be a valid URL)." },
                    "text": { "type": "string", "description": "Commentary text to accompany the shared URL." },
                    "title": { "type": "string", "description": "Optional title for the shared URL content." },
                    "description": {
                        "type": "string",
                        "description": "Optional description for the shared URL content."
                    },
                    "visibility": visibility
                }
            }),
        ),
    };
    ToolDefinition {
        name,
        description: description.to_string(),
        input_schema,
    }
}

/// Schema for an array of strings.
fn string_array(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Arguments for `linkedin_get_profile_info`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileArgs {
    /// Member id; the caller's own profile when absent.
    person_id: Option<String>,
}

/// Arguments for `linkedin_create_post`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreatePostArgs {
    /// Body text.
    text: Option<String>,
    /// Title line.
    title: Option<String>,
    /// Hashtags.
    hashtags: Option<Vec<String>>,
    /// Audience name.
    visibility: Option<String>,
}

/// Arguments for `linkedin_format_rich_post`; `null` fields count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatRichPostArgs {
    /// Base text.
    text: Option<String>,
    /// Bold phrases.
    bold_text: Option<Vec<String>>,
    /// Italic phrases.
    italic_text: Option<Vec<String>>,
    /// Bullet items.
    bullet_points: Option<Vec<String>>,
    /// Numbered items.
    numbered_list: Option<Vec<String>>,
    /// Hashtags.
    hashtags: Option<Vec<String>>,
    /// Mentions.
    mentions: Option<Vec<String>>,
}

/// Arguments for `linkedin_create_url_share`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UrlShareArgs {
    /// Shared URL.
    url: Option<String>,
    /// Commentary.
    text: Option<String>,
    /// Preview title.
    title: Option<String>,
    /// Preview description.
    description: Option<String>,
    /// Audience name.
    visibility: Option<String>,
}

/// Decodes tool arguments; `null` is treated as an empty object.
fn parse_args<T: DeserializeOwned + Default>(arguments: Value) -> Result<T, ToolError> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

/// Returns the value when non-empty, else a missing-parameter error.
fn require(value: Option<String>, param: &'static str) -> Result<String, ToolError> {
    value.filter(|value| !value.is_empty()).ok_or(ToolError::MissingParam(param))
}

/// Parses an optional visibility, defaulting to public.
fn parse_visibility(value: Option<&str>) -> Result<Visibility, ToolError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map_err(ToolError::LinkedIn),
        None => Ok(Visibility::Public),
    }
}

// ============================================================================
// SECTION: Tool Output
// ============================================================================

/// Text result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Text content returned to the client.
    pub text: String,
    /// Whether the call failed.
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Failed output.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Dispatches tool calls to the LinkedIn client.
#[derive(Debug, Clone)]
pub struct ToolRouter {
    /// API client.
    client: LinkedInClient,
    /// Token used when the request carries no override.
    default_token: String,
}

impl ToolRouter {
    /// Creates a router using `default_token` for requests without an override.
    #[must_use]
    pub fn new(client: LinkedInClient, default_token: impl Into<String>) -> Self {
        Self {
            client,
            default_token: default_token.into(),
        }
    }

    /// Lists the available tools.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Executes a tool call.
    pub async fn handle_tool_call(
        &self,
        context: &RequestContext,
        name: &str,
        arguments: Value,
    ) -> ToolOutput {
        let tool = match name.parse::<ToolName>() {
            Ok(tool) => tool,
            Err(err) => {
                tracing::warn!(tool = name, "unknown tool requested");
                return ToolOutput::text(err.to_string());
            }
        };
        match self.dispatch(context, tool, arguments).await {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => ToolOutput::text(text),
                Err(err) => ToolOutput::error(format!("Error: {err}")),
            },
            Err(err @ ToolError::MissingParam(_)) => ToolOutput::text(err.to_string()),
            Err(err) => {
                tracing::error!(tool = %tool, error = %err, "tool execution failed");
                match err.auth_response() {
                    Some(response) => match response.to_pretty_json() {
                        Ok(text) => ToolOutput::error(text),
                        Err(err) => ToolOutput::error(format!("Error: {err}")),
                    },
                    None => ToolOutput::error(format!("Error: {err}")),
                }
            }
        }
    }

    /// Runs a known tool and returns its JSON result.
    async fn dispatch(
        &self,
        context: &RequestContext,
        tool: ToolName,
        arguments: Value,
    ) -> Result<Value, ToolError> {
        let token = context.access_token(&self.default_token);
        match tool {
            ToolName::LinkedinFormatRichPost => {
                let args: FormatRichPostArgs = parse_args(arguments)?;
                let request = RichPostRequest {
                    text: require(args.text, "text")?,
                    bold_text: args.bold_text.unwrap_or_default(),
                    italic_text: args.italic_text.unwrap_or_default(),
                    bullet_points: args.bullet_points.unwrap_or_default(),
                    numbered_list: args.numbered_list.unwrap_or_default(),
                    hashtags: args.hashtags.unwrap_or_default(),
                    mentions: args.mentions.unwrap_or_default(),
                };
                to_value(&format_rich_post(&request))
            }
            ToolName::LinkedinGetProfileInfo => {
                let args: ProfileArgs = parse_args(arguments)?;
                ensure_token(token)?;
                let profile = self.client.get_profile_info(token, args.person_id.as_deref()).await?;
                to_value(&profile)
            }
            ToolName::LinkedinCreatePost => {
                let args: CreatePostArgs = parse_args(arguments)?;
                let request = PostRequest {
                    text: require(args.text, "text")?,
                    title: args.title,
                    visibility: parse_visibility(args.visibility.as_deref())?,
                    hashtags: args.hashtags.unwrap_or_default(),
                };
                ensure_token(token)?;
                to_value(&self.client.create_post(token, &request).await?)
            }
            ToolName::LinkedinCreateUrlShare => {
                let args: UrlShareArgs = parse_args(arguments)?;
                let request = UrlShareRequest {
                    url: require(args.url, "url")?,
                    text: require(args.text, "text")?,
                    title: args.title,
                    description: args.description,
                    visibility: parse_visibility(args.visibility.as_deref())?,
                };
                ensure_token(token)?;
                to_value(&self.client.create_url_share(token, &request).await?)
            }
        }
    }
}

/// Rejects calls with no usable token.
fn ensure_token(token: &str) -> Result<(), ToolError> {
    if token.trim().is_empty() { Err(ToolError::MissingToken) } else { Ok(()) }
}

/// Serializes a tool result.
fn to_value<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|_| ToolError::Serialization)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    /// Required argument missing or empty.
    #[error("Error: {0} parameter is required")]
    MissingParam(&'static str),
    /// Arguments failed to decode.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// No token configured or supplied.
    #[error("LinkedIn access token is not configured")]
    MissingToken,
    /// LinkedIn call failed.
    #[error(transparent)]
    LinkedIn(#[from] LinkedInError),
    /// Result serialization failed.
    #[error("serialization failure")]
    Serialization,
}

impl ToolError {
    /// Shared auth payload for credential failures.
    #[must_use]
    pub fn auth_response(&self) -> Option<AuthErrorResponse> {
        match self {
            Self::MissingToken => {
                Some(AuthErrorResponse::unauthenticated(SERVICE_NAME, &self.to_string()))
            }
            Self::LinkedIn(err) => match err.status() {
                Some(status @ (401 | 403)) => {
                    Some(auth_error_response(SERVICE_NAME, &err.to_string(), status))
                }
                _ => None,
            },
            _ => None,
        }
    }
}
