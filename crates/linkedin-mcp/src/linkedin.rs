// crates/linkedin-mcp/src/linkedin.rs
// ============================================================================
// Module: LinkedIn API Client
// Description: Async client for the LinkedIn REST endpoints the tools use.
// Purpose: Fetch profiles and publish posts and URL shares.
// Dependencies: reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`LinkedInClient`] holds no credentials; every call takes the bearer token
//! resolved for the current request. Non-success statuses surface as
//! [`LinkedInError::Status`] so the tool layer can map 401 and 403 onto the
//! shared auth error payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use reqwest::Response;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::format::prefix_once;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.linkedin.com";
/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Rest.li protocol header name.
const RESTLI_PROTOCOL_HEADER: &str = "x-restli-protocol-version";
/// Rest.li protocol version sent on every call.
const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";
/// Header carrying the created entity id.
const RESTLI_ID_HEADER: &str = "x-restli-id";
/// Upper bound on error body text kept in [`LinkedInError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 2048;

// ============================================================================
// SECTION: Visibility
// ============================================================================

/// Audience of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Anyone.
    #[default]
    Public,
    /// First-degree connections.
    Connections,
    /// Signed-in members.
    LoggedInUsers,
}

impl Visibility {
    /// Returns the tool-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Connections => "CONNECTIONS",
            Self::LoggedInUsers => "LOGGED_IN_USERS",
        }
    }

    /// Returns the value LinkedIn expects in `MemberNetworkVisibility`.
    #[must_use]
    pub const fn api_value(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Connections => "CONNECTIONS",
            Self::LoggedInUsers => "LOGGED_IN",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = LinkedInError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "CONNECTIONS" => Ok(Self::Connections),
            "LOGGED_IN_USERS" | "LOGGED_IN" => Ok(Self::LoggedInUsers),
            _ => Err(LinkedInError::InvalidVisibility(value.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Normalized profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    /// Member identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// Primary email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl ProfileInfo {
    /// Normalizes a `/v2/userinfo` or `/v2/people` payload.
    #[must_use]
    pub fn from_api(value: &Value) -> Self {
        let first_name = string_field(value, &["given_name", "localizedFirstName"]);
        let last_name = string_field(value, &["family_name", "localizedLastName"]);
        let name = string_field(value, &["name"]).or_else(|| {
            let joined = [first_name.as_deref(), last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        });
        Self {
            id: string_field(value, &["sub", "id"]),
            first_name,
            last_name,
            name,
            headline: string_field(value, &["headline", "localizedHeadline"]),
            email: string_field(value, &["email"]),
            picture: string_field(value, &["picture"]),
        }
    }
}

/// Result of a published post or share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResult {
    /// Always `true`.
    pub success: bool,
    /// Created post URN when LinkedIn reported one.
    pub post_id: Option<String>,
    /// Requested audience.
    pub visibility: Visibility,
    /// Human-readable summary.
    pub message: String,
    /// Shared URL for URL shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Text post parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRequest {
    /// Body text.
    pub text: String,
    /// Optional title line.
    pub title: Option<String>,
    /// Audience.
    pub visibility: Visibility,
    /// Hashtags appended after the body.
    pub hashtags: Vec<String>,
}

/// URL share parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlShareRequest {
    /// Shared URL.
    pub url: String,
    /// Commentary text.
    pub text: String,
    /// Optional preview title.
    pub title: Option<String>,
    /// Optional preview description.
    pub description: Option<String>,
    /// Audience.
    pub visibility: Visibility,
}

/// Builds post commentary: optional title line and blank line, the text, then hashtags.
#[must_use]
pub fn compose_commentary(text: &str, title: Option<&str>, hashtags: &[String]) -> String {
    let mut commentary = String::new();
    if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
        commentary.push_str(title);
        commentary.push_str("\n\n");
    }
    commentary.push_str(text);
    let tags: Vec<String> = hashtags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| prefix_once('#', tag))
        .collect();
    if !tags.is_empty() {
        commentary.push_str("\n\n");
        commentary.push_str(&tags.join(" "));
    }
    commentary
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedInConfig {
    /// API base URL.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// LinkedIn REST client.
#[derive(Debug, Clone)]
pub struct LinkedInClient {
    /// Base URL without trailing slash.
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl LinkedInClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedInError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: LinkedInConfig) -> Result<Self, LinkedInError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| LinkedInError::Transport(err.to_string()))?;
        let mut base_url = config.base_url;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches a profile; the token owner's when `person_id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedInError`] when the request fails or is rejected.
    pub async fn get_profile_info(
        &self,
        token: &str,
        person_id: Option<&str>,
    ) -> Result<ProfileInfo, LinkedInError> {
        let path = match person_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => format!("/v2/people/(id:{id})"),
            None => "/v2/userinfo".to_string(),
        };
        let value = self.get_json(token, &path).await?;
        Ok(ProfileInfo::from_api(&value))
    }

    /// Publishes a text post as the token owner.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedInError`] when the author cannot be resolved or the post is rejected.
    pub async fn create_post(
        &self,
        token: &str,
        request: &PostRequest,
    ) -> Result<PostResult, LinkedInError> {
        let author = self.author_urn(token).await?;
        let commentary =
            compose_commentary(&request.text, request.title.as_deref(), &request.hashtags);
        let body = ugc_post_body(&author, &commentary, "NONE", None, request.visibility);
        let post_id = self.publish(token, &body).await?;
        tracing::info!(visibility = %request.visibility, "linkedin post created");
        Ok(PostResult {
            success: true,
            post_id,
            visibility: request.visibility,
            message: "Post created successfully".to_string(),
            url: None,
        })
    }

    /// Shares a URL with a link preview as the token owner.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedInError::InvalidUrl`] for non-http(s) URLs, otherwise as
    /// [`Self::create_post`].
    pub async fn create_url_share(
        &self,
        token: &str,
        request: &UrlShareRequest,
    ) -> Result<PostResult, LinkedInError> {
        let url = parse_share_url(&request.url)?;
        let author = self.author_urn(token).await?;
        let mut media = json!({
            "status": "READY",
            "originalUrl": url.as_str(),
        });
        if let Some(title) = non_blank(request.title.as_deref()) {
            media["title"] = json!({ "text": title });
        }
        if let Some(description) = non_blank(request.description.as_deref()) {
            media["description"] = json!({ "text": description });
        }
        let body = ugc_post_body(&author, &request.text, "ARTICLE", Some(media), request.visibility);
        let post_id = self.publish(token, &body).await?;
        tracing::info!(visibility = %request.visibility, "linkedin url share created");
        Ok(PostResult {
            success: true,
            post_id,
            visibility: request.visibility,
            message: "URL shared successfully".to_string(),
            url: Some(url.to_string()),
        })
    }

    /// Resolves the author URN from the token owner's `sub`.
    async fn author_urn(&self, token: &str) -> Result<String, LinkedInError> {
        let value = self.get_json(token, "/v2/userinfo").await?;
        let member = string_field(&value, &["sub", "id"]).ok_or(LinkedInError::MissingMemberId)?;
        Ok(format!("urn:li:person:{member}"))
    }

    /// Sends a UGC post and returns the created id.
    async fn publish(&self, token: &str, body: &Value) -> Result<Option<String>, LinkedInError> {
        let response = self
            .client
            .post(format!("{}/v2/ugcPosts", self.base_url))
            .headers(build_headers(token)?)
            .json(body)
            .send()
            .await
            .map_err(|err| LinkedInError::Transport(err.to_string()))?;
        let response = check_status(response).await?;
        let header_id = response
            .headers()
            .get(RESTLI_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(|err| LinkedInError::Transport(err.to_string()))?;
        let body_id = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| string_field(&value, &["id"]));
        Ok(header_id.or(body_id))
    }

    /// Issues an authenticated GET and decodes the JSON body.
    async fn get_json(&self, token: &str, path: &str) -> Result<Value, LinkedInError> {
        tracing::debug!(path, "linkedin api request");
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .headers(build_headers(token)?)
            .send()
            .await
            .map_err(|err| LinkedInError::Transport(err.to_string()))?;
        let response = check_status(response).await?;
        let text = response.text().await.map_err(|err| LinkedInError::Transport(err.to_string()))?;
        serde_json::from_str(&text).map_err(|err| LinkedInError::Decode(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds bearer and Rest.li headers.
fn build_headers(token: &str) -> Result<HeaderMap, LinkedInError> {
    let mut headers = HeaderMap::new();
    let bearer =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| LinkedInError::InvalidToken)?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(RESTLI_PROTOCOL_HEADER, HeaderValue::from_static(RESTLI_PROTOCOL_VERSION));
    Ok(headers)
}

/// Converts non-success responses into [`LinkedInError::Status`].
async fn check_status(response: Response) -> Result<Response, LinkedInError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LinkedInError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

/// Builds a `ugcPosts` request body.
fn ugc_post_body(
    author: &str,
    commentary: &str,
    category: &str,
    media: Option<Value>,
    visibility: Visibility,
) -> Value {
    let mut content = json!({
        "shareCommentary": { "text": commentary },
        "shareMediaCategory": category,
    });
    if let Some(media) = media {
        content["media"] = json!([media]);
    }
    json!({
        "author": author,
        "lifecycleState": "PUBLISHED",
        "specificContent": { "com.linkedin.ugc.ShareContent": content },
        "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": visibility.api_value() },
    })
}

/// Accepts absolute http(s) URLs only.
fn parse_share_url(raw: &str) -> Result<Url, LinkedInError> {
    let url = Url::parse(raw.trim()).map_err(|_| LinkedInError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(LinkedInError::InvalidUrl(raw.to_string())),
    }
}

/// Returns the first non-blank string among `keys`.
fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|field| !field.trim().is_empty())
        .map(str::to_string)
}

/// Trims and drops blank optional text.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// LinkedIn client failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkedInError {
    /// Token cannot be sent as a header value.
    #[error("access token contains invalid header characters")]
    InvalidToken,
    /// Shared URL is not an absolute http(s) URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Visibility name is not recognized.
    #[error("invalid visibility: {0} (expected PUBLIC, CONNECTIONS, LOGGED_IN_USERS)")]
    InvalidVisibility(String),
    /// Request did not complete.
    #[error("linkedin request failed: {0}")]
    Transport(String),
    /// LinkedIn answered with a non-success status.
    #[error("LinkedIn API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// Response body was not JSON.
    #[error("invalid linkedin response: {0}")]
    Decode(String),
    /// Profile response carried no member id.
    #[error("linkedin profile response has no member id")]
    MissingMemberId,
}

impl LinkedInError {
    /// Returns the HTTP status for [`LinkedInError::Status`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only assertions."
    )]

    use serde_json::json;

    use super::ProfileInfo;
    use super::Visibility;
    use super::compose_commentary;
    use super::parse_share_url;
    use super::ugc_post_body;

    #[test]
    fn visibility_maps_logged_in_users() {
        let visibility: Visibility = "logged_in_users".parse().unwrap();
        assert_eq!(visibility.api_value(), "LOGGED_IN");
        assert!("FRIENDS".parse::<Visibility>().is_err());
    }

    #[test]
    fn commentary_places_title_then_text_then_tags() {
        let commentary =
            compose_commentary("Body", Some("Title"), &["rust".to_string(), "#mcp".to_string()]);
        assert_eq!(commentary, "Title\n\nBody\n\n#rust #mcp");
        assert_eq!(compose_commentary("Body", Some(" "), &[]), "Body");
    }

    #[test]
    fn profile_normalizes_people_payload() {
        let profile = ProfileInfo::from_api(&json!({
            "id": "abc",
            "localizedFirstName": "Ada",
            "localizedLastName": "Lovelace",
            "localizedHeadline": "Engineer",
        }));
        assert_eq!(profile.id.as_deref(), Some("abc"));
        assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.headline.as_deref(), Some("Engineer"));
        assert_eq!(profile.email, None);
    }

    #[test]
    fn share_url_requires_http_scheme() {
        assert!(parse_share_url("https://example.com/post").is_ok());
        assert!(parse_share_url("ftp://example.com/file").is_err());
        assert!(parse_share_url("not a url").is_err());
    }

    #[test]
    fn article_body_carries_single_media_entry() {
        let body = ugc_post_body(
            "urn:li:person:1",
            "look",
            "ARTICLE",
            Some(json!({ "originalUrl": "https://example.com/" })),
            Visibility::Connections,
        );
        let content = &body["specificContent"]["com.linkedin.ugc.ShareContent"];
        assert_eq!(content["shareMediaCategory"], "ARTICLE");
        assert_eq!(content["media"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["visibility"]["com.linkedin.ugc.MemberNetworkVisibility"], "CONNECTIONS");
    }
}
