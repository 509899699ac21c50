// crates/linkedin-mcp/src/auth.rs
// ============================================================================
// Module: Request Context
// Description: Per-request credential and transport metadata.
// Purpose: Carry token overrides from transport headers to tool handlers.
// Dependencies: axum
// ============================================================================

//! ## Overview
//! Each transport builds a [`RequestContext`] from the incoming headers and
//! hands it to the tool router explicitly. A non-blank token header replaces
//! the configured token for that request (or SSE session) only.

use axum::http::HeaderMap;

/// Header carrying a per-session token on the SSE transport.
pub const SSE_TOKEN_HEADER: &str = "x-linkedin-token";
/// Header carrying a per-request token on the streamable HTTP transport.
pub const HTTP_TOKEN_HEADER: &str = "x-auth-token";

/// Transport a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Legacy SSE session with POSTed messages.
    Sse,
    /// Stateless streamable HTTP.
    StreamableHttp,
    /// In-process call with no transport.
    Local,
}

/// Per-request context used by tool handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Transport used by the caller.
    pub transport: Transport,
    /// Token supplied by the caller, overriding the configured one.
    pub token_override: Option<String>,
    /// Optional request identifier for logging.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a context with no override.
    #[must_use]
    pub const fn local() -> Self {
        Self {
            transport: Transport::Local,
            token_override: None,
            request_id: None,
        }
    }

    /// Builds a context from transport headers.
    #[must_use]
    pub fn from_headers(transport: Transport, headers: &HeaderMap) -> Self {
        let header = match transport {
            Transport::Sse => SSE_TOKEN_HEADER,
            Transport::StreamableHttp | Transport::Local => HTTP_TOKEN_HEADER,
        };
        let token_override = headers
            .get(header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self {
            transport,
            token_override,
            request_id: None,
        }
    }

    /// Returns a copy carrying `token` as the override.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token_override = Some(token.into());
        self
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns the override when present, else `configured`.
    #[must_use]
    pub fn access_token<'a>(&'a self, configured: &'a str) -> &'a str {
        self.token_override.as_deref().unwrap_or(configured)
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

    use axum::http::HeaderMap;
    use axum::http::HeaderValue;

    use super::RequestContext;
    use super::Transport;

    #[test]
    fn sse_reads_linkedin_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-linkedin-token", HeaderValue::from_static("session-token"));
        headers.insert("x-auth-token", HeaderValue::from_static("ignored"));
        let context = RequestContext::from_headers(Transport::Sse, &headers);
        assert_eq!(context.access_token("configured"), "session-token");
    }

    #[test]
    fn streamable_http_reads_auth_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("request-token"));
        let context = RequestContext::from_headers(Transport::StreamableHttp, &headers);
        assert_eq!(context.access_token("configured"), "request-token");
    }

    #[test]
    fn blank_header_falls_back_to_configured_token() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("  "));
        let context = RequestContext::from_headers(Transport::StreamableHttp, &headers);
        assert_eq!(context.token_override, None);
        assert_eq!(context.access_token("configured"), "configured");
    }
}
