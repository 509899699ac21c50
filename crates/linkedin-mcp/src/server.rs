// crates/linkedin-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: JSON-RPC 2.0 over SSE sessions and streamable HTTP.
// Purpose: Expose the LinkedIn tools to MCP clients.
// Dependencies: axum, tokio, tokio-stream, rand
// ============================================================================

//! ## Overview
//! Two transports share one dispatcher:
//! - `GET /sse` opens a session. The first event is `endpoint`, naming the
//!   URL the client POSTs its messages to; responses arrive as `message`
//!   events on the same stream.
//! - `POST /mcp` is stateless. Each request is answered either with a JSON
//!   body or with a single-event SSE stream.
//!
//! Token headers are read once per request (or per SSE session) into a
//! [`RequestContext`] that travels with the call. Session bookkeeping never
//! holds the registry lock across an await.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::task::Context;
use std::task::Poll;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::response::Sse;
use axum::response::sse::Event;
use axum::response::sse::KeepAlive;
use axum::routing::get;
use axum::routing::post;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;

use crate::auth::RequestContext;
use crate::auth::Transport;
use crate::tools::ToolDefinition;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "linkedin-mcp-server";
/// Protocol version answered when the client does not request one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";
/// Default request body limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// SSE session route.
pub const SSE_PATH: &str = "/sse";
/// SSE message POST route.
pub const MESSAGES_PATH: &str = "/messages/";
/// Streamable HTTP route.
pub const MCP_PATH: &str = "/mcp";
/// Buffered events per SSE session.
const SESSION_CHANNEL_CAPACITY: usize = 32;
/// JSON-RPC version string.
const JSONRPC_VERSION: &str = "2.0";
/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The JSON is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// Listener settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    /// Socket address to bind.
    pub bind: SocketAddr,
    /// Answer `/mcp` with JSON bodies instead of SSE streams.
    pub json_response: bool,
    /// Maximum accepted request body.
    pub max_body_bytes: usize,
}

impl ServerOptions {
    /// Options binding every interface on `port`.
    #[must_use]
    pub fn new(port: u16, json_response: bool) -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], port)),
            json_response,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// MCP server instance.
pub struct McpServer {
    /// Listener settings.
    options: ServerOptions,
    /// State shared with request handlers.
    state: Arc<ServerState>,
}

impl McpServer {
    /// Builds a server around `router`.
    #[must_use]
    pub fn new(router: ToolRouter, options: ServerOptions) -> Self {
        let state = Arc::new(ServerState {
            router,
            sessions: SessionRegistry::default(),
            json_response: options.json_response,
            max_body_bytes: options.max_body_bytes,
        });
        Self {
            options,
            state,
        }
    }

    /// Listener settings.
    #[must_use]
    pub const fn options(&self) -> &ServerOptions {
        &self.options
    }

    /// Builds the HTTP application.
    pub fn app(&self) -> Router {
        Router::new()
            .route(SSE_PATH, get(handle_sse))
            .route(MESSAGES_PATH, post(handle_message_post))
            .route("/messages", post(handle_message_post))
            .route(MCP_PATH, post(handle_mcp))
            .route("/mcp/", post(handle_mcp))
            .with_state(Arc::clone(&self.state))
    }

    /// Handles one raw JSON-RPC payload; `None` for notifications.
    pub async fn handle_message(
        &self,
        context: &RequestContext,
        payload: &[u8],
    ) -> Option<JsonRpcResponse> {
        self.state.handle_payload(context, payload).await.1
    }

    /// Number of open SSE sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.state.sessions.len()
    }

    /// Binds the configured address and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        let listener = TcpListener::bind(self.options.bind)
            .await
            .map_err(|err| McpServerError::Transport(format!("bind {}: {err}", self.options.bind)))?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serves on `listener` until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), McpServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|err| McpServerError::Transport(format!("local address: {err}")))?;
        let port = addr.port();
        tracing::info!(%addr, "server starting with dual transports");
        tracing::info!("  - SSE endpoint: http://localhost:{port}{SSE_PATH}");
        tracing::info!("  - StreamableHTTP endpoint: http://localhost:{port}{MCP_PATH}");
        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| McpServerError::Transport(format!("http server failed: {err}")))?;
        tracing::info!("server shut down");
        Ok(())
    }
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    }
}

// ============================================================================
// SECTION: Shared State
// ============================================================================

/// Shared server state for HTTP and SSE handlers.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Open SSE sessions.
    sessions: SessionRegistry,
    /// Streamable HTTP response mode.
    json_response: bool,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

impl ServerState {
    /// Parses and dispatches a raw payload.
    async fn handle_payload(
        &self,
        context: &RequestContext,
        payload: &[u8],
    ) -> (StatusCode, Option<JsonRpcResponse>) {
        if payload.len() > self.max_body_bytes {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Some(JsonRpcResponse::failure(Value::Null, INVALID_REQUEST, "request body too large")),
            );
        }
        let Ok(value) = serde_json::from_slice::<Value>(payload) else {
            return (
                StatusCode::BAD_REQUEST,
                Some(JsonRpcResponse::failure(Value::Null, PARSE_ERROR, "parse error")),
            );
        };
        let response = self.handle_value(context, value).await;
        let status = match &response {
            Some(response) if response.error_code() == Some(INVALID_REQUEST) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::OK,
        };
        (status, response)
    }

    /// Dispatches a decoded message; `None` for notifications.
    async fn handle_value(&self, context: &RequestContext, value: Value) -> Option<JsonRpcResponse> {
        match JsonRpcRequest::from_value(value) {
            Ok(request) if request.is_notification() => {
                tracing::debug!(method = %request.method, "notification received");
                None
            }
            Ok(request) => Some(self.handle_request(context, request).await),
            Err(response) => response,
        }
    }

    /// Dispatches a JSON-RPC request.
    async fn handle_request(&self, context: &RequestContext, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .as_ref()
                    .and_then(|params| params.get("protocolVersion"))
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL_VERSION);
                JsonRpcResponse::success(
                    id,
                    json!({
                        "protocolVersion": protocol_version,
                        "capabilities": { "tools": { "listChanged": false } },
                        "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
                    }),
                )
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => match serde_json::to_value(ToolListResult {
                tools: self.router.list_tools(),
            }) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(_) => JsonRpcResponse::failure(id, INTERNAL_ERROR, "serialization failed"),
            },
            "tools/call" => {
                let params = request.params.unwrap_or(Value::Null);
                let Ok(call) = serde_json::from_value::<ToolCallParams>(params) else {
                    return JsonRpcResponse::failure(id, INVALID_PARAMS, "invalid tool params");
                };
                let context = context.clone().with_request_id(id.to_string());
                tracing::info!(tool = %call.name, transport = ?context.transport, "tool call");
                let output = self.router.handle_tool_call(&context, &call.name, call.arguments).await;
                match serde_json::to_value(ToolCallResult {
                    content: vec![ToolContent::Text {
                        text: output.text,
                    }],
                    is_error: output.is_error,
                }) {
                    Ok(value) => JsonRpcResponse::success(id, value),
                    Err(_) => JsonRpcResponse::failure(id, INTERNAL_ERROR, "serialization failed"),
                }
            }
            _ => JsonRpcResponse::failure(id, METHOD_NOT_FOUND, "method not found"),
        }
    }
}

// ============================================================================
// SECTION: SSE Sessions
// ============================================================================

/// One open SSE session.
#[derive(Clone)]
struct Session {
    /// Event sink for the session stream.
    sender: mpsc::Sender<Event>,
    /// Context captured when the session opened.
    context: RequestContext,
}

/// Open sessions keyed by id.
#[derive(Default)]
struct SessionRegistry {
    /// Sessions guarded by a short-lived lock.
    sessions: Mutex<BTreeMap<String, Session>>,
}

impl SessionRegistry {
    /// Registers a session.
    fn insert(&self, id: String, session: Session) -> Result<(), McpServerError> {
        self.sessions
            .lock()
            .map_err(|_| McpServerError::Internal("session registry lock poisoned".to_string()))?
            .insert(id, session);
        Ok(())
    }

    /// Returns a copy of the session.
    fn get(&self, id: &str) -> Result<Option<Session>, McpServerError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|_| McpServerError::Internal("session registry lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    /// Drops a session.
    fn remove(&self, id: &str) {
        if let Ok(mut guard) = self.sessions.lock() {
            guard.remove(id);
        }
    }

    /// Number of sessions.
    fn len(&self) -> usize {
        self.sessions.lock().map_or(0, |guard| guard.len())
    }
}

/// Session event stream; unregisters the session when dropped.
struct SessionStream {
    /// Events queued for the client.
    inner: ReceiverStream<Event>,
    /// State holding the registry.
    state: Arc<ServerState>,
    /// Session id.
    session_id: String,
}

impl Stream for SessionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx).map(|event| event.map(Ok))
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.state.sessions.remove(&self.session_id);
        tracing::debug!(session_id = %self.session_id, "sse session closed");
    }
}

/// Query string of the message POST route.
#[derive(Debug, Deserialize)]
struct SessionQuery {
    /// Target session.
    session_id: Option<String>,
}

/// Generates a random session id.
fn new_session_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Opens an SSE session.
async fn handle_sse(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let context = RequestContext::from_headers(Transport::Sse, &headers);
    let session_id = new_session_id();
    let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
    let endpoint = format!("{MESSAGES_PATH}?session_id={session_id}");
    if sender.send(Event::default().event("endpoint").data(endpoint)).await.is_err() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "session setup failed").into_response();
    }
    let session = Session {
        sender,
        context,
    };
    if let Err(err) = state.sessions.insert(session_id.clone(), session) {
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }
    tracing::info!(session_id = %session_id, "handling SSE connection");
    let stream = SessionStream {
        inner: ReceiverStream::new(receiver),
        state,
        session_id,
    };
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

/// Accepts a message for an SSE session; the reply is delivered on the stream.
async fn handle_message_post(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SessionQuery>,
    bytes: Bytes,
) -> Response {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    let session = match state.sessions.get(&session_id) {
        Ok(Some(session)) => session,
        Ok(None) => return (StatusCode::NOT_FOUND, "Could not find session").into_response(),
        Err(err) => return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    };
    if bytes.len() > state.max_body_bytes {
        return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
    }
    let Ok(value) = serde_json::from_slice::<Value>(&bytes) else {
        return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
    };
    tokio::spawn(async move {
        let Some(response) = state.handle_value(&session.context, value).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(payload) => {
                let event = Event::default().event("message").data(payload);
                if session.sender.send(event).await.is_err() {
                    tracing::debug!(session_id = %session_id, "sse session gone before reply");
                }
            }
            Err(err) => tracing::error!(error = %err, "json-rpc serialization failed"),
        }
    });
    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Handles a stateless streamable HTTP request.
async fn handle_mcp(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    tracing::debug!("handling StreamableHTTP request");
    let context = RequestContext::from_headers(Transport::StreamableHttp, &headers);
    let (status, response) = state.handle_payload(&context, &bytes).await;
    let Some(response) = response else {
        return StatusCode::ACCEPTED.into_response();
    };
    if state.json_response {
        return (status, Json(response)).into_response();
    }
    let payload = serde_json::to_string(&response).unwrap_or_else(|_| {
        "{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{\"code\":-32603,\"message\":\"serialization \
         failed\"}}"
            .to_string()
    });
    let event = Event::default().event("message").data(payload);
    (status, Sse::new(tokio_stream::once(Ok::<Event, Infallible>(event)))).into_response()
}

// ============================================================================
// SECTION: JSON-RPC Types
// ============================================================================

/// Incoming JSON-RPC request or notification.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Request identifier; `None` for notifications.
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Optional parameters payload.
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Validates a decoded message.
    ///
    /// # Errors
    ///
    /// Returns the error response to send, or `None` when the malformed
    /// message was a notification.
    pub fn from_value(value: Value) -> Result<Self, Option<JsonRpcResponse>> {
        let Value::Object(mut map) = value else {
            return Err(Some(JsonRpcResponse::failure(
                Value::Null,
                INVALID_REQUEST,
                "invalid json-rpc request",
            )));
        };
        let id = map.remove("id");
        let invalid = |id: Option<Value>, message: &str| {
            id.map(|id| JsonRpcResponse::failure(id, INVALID_REQUEST, message))
        };
        if map.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(invalid(id, "invalid json-rpc version"));
        }
        let Some(Value::String(method)) = map.remove("method") else {
            return Err(invalid(id, "missing method"));
        };
        Ok(Self {
            id,
            method,
            params: map.remove("params"),
        })
    }

    /// Returns true when no response is expected.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    pub jsonrpc: String,
    /// Request identifier.
    pub id: Value,
    /// Successful result payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response.
    #[must_use]
    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Error code, if the response is an error.
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().map(|error| error.code)
    }
}

/// JSON-RPC error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
}

/// Tool call parameters.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
    /// Whether the tool failed.
    #[serde(rename = "isError")]
    is_error: bool,
}

/// Tool output blocks.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// Text output.
    Text {
        /// Text payload.
        text: String,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
    /// Internal state errors.
    #[error("internal error: {0}")]
    Internal(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
