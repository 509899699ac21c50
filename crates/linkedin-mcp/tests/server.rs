// crates/linkedin-mcp/tests/server.rs
// ============================================================================
// Module: MCP Server Tests
// Description: JSON-RPC dispatch and HTTP transports end to end.
// Purpose: Ensure both transports answer MCP clients correctly.
// Dependencies: linkedin-mcp, reqwest, tokio
// ============================================================================

//! ## Overview
//! Dispatch tests call [`linkedin_mcp::McpServer::handle_message`] directly.
//! Transport tests bind an ephemeral port and talk HTTP with `reqwest`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::time::Duration;

use linkedin_mcp::McpServer;
use linkedin_mcp::RequestContext;
use linkedin_mcp::ServerOptions;
use linkedin_mcp::server::DEFAULT_MAX_BODY_BYTES;
use linkedin_mcp::server::JsonRpcResponse;
use linkedin_mcp::server::METHOD_NOT_FOUND;
use linkedin_mcp::server::PARSE_ERROR;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn server(json_response: bool) -> McpServer {
    McpServer::new(
        common::router(common::UNREACHABLE_BASE_URL),
        ServerOptions {
            bind: ([127, 0, 0, 1], 0).into(),
            json_response,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        },
    )
}

async fn call(server: &McpServer, payload: Value) -> Option<JsonRpcResponse> {
    server.handle_message(&RequestContext::local(), payload.to_string().as_bytes()).await
}

async fn spawn(json_response: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = server(json_response);
    tokio::spawn(server.serve_with_shutdown(listener, std::future::pending()));
    format!("http://{addr}")
}

/// Returns the data of the first complete event named `name`.
fn find_event(buffer: &str, name: &str) -> Option<String> {
    let complete = &buffer[..buffer.rfind("\n\n")?];
    complete.split("\n\n").find_map(|block| {
        let mut event = None;
        let mut data = None;
        for line in block.lines() {
            if let Some(value) = line.strip_prefix("event:") {
                event = Some(value.trim());
            } else if let Some(value) = line.strip_prefix("data:") {
                data = Some(value.trim().to_string());
            }
        }
        if event == Some(name) { data } else { None }
    })
}

/// Reads stream chunks until an event named `name` is complete.
async fn read_event(response: &mut reqwest::Response, buffer: &mut String, name: &str) -> String {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(data) = find_event(buffer, name) {
                return data;
            }
            let chunk = response.chunk().await.unwrap().expect("stream ended early");
            buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    })
    .await
    .expect("timed out waiting for sse event")
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

#[tokio::test]
async fn initialize_reports_server_info() {
    let server = server(true);
    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
               "params": {"protocolVersion": "2025-03-26"}}),
    )
    .await
    .unwrap();
    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert_eq!(result["serverInfo"]["name"], "linkedin-mcp-server");
    assert!(result["capabilities"].get("tools").is_some());
}

#[tokio::test]
async fn ping_returns_empty_result() {
    let server = server(true);
    let response = call(&server, json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await.unwrap();
    assert_eq!(response.id, json!("p"));
    assert_eq!(response.result, Some(json!({})));
}

#[tokio::test]
async fn tools_list_returns_catalog() {
    let server = server(true);
    let response =
        call(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await.unwrap();
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 4);
    assert!(tools.iter().all(|tool| tool.get("inputSchema").is_some()));
}

#[tokio::test]
async fn tools_call_wraps_output_as_text_content() {
    let server = server(true);
    let response = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "linkedin_format_rich_post",
                          "arguments": {"text": "Hi", "mentions": ["ada"]}}}),
    )
    .await
    .unwrap();
    let result = response.result.unwrap();
    assert_eq!(result["isError"], false);
    assert_eq!(result["content"][0]["type"], "text");
    let text = result["content"][0]["text"].as_str().unwrap();
    let formatted: Value = serde_json::from_str(text).unwrap();
    assert_eq!(formatted["formatted_text"], "Hi\n\n@ada");
}

#[tokio::test]
async fn tools_call_without_name_is_invalid_params() {
    let server = server(true);
    let response =
        call(&server, json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {}}))
            .await
            .unwrap();
    assert_eq!(response.error_code(), Some(-32602));
}

#[tokio::test]
async fn notifications_get_no_response() {
    let server = server(true);
    let response =
        call(&server, json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let server = server(true);
    let response =
        call(&server, json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"})).await.unwrap();
    assert_eq!(response.error_code(), Some(METHOD_NOT_FOUND));
    assert_eq!(response.id, json!(5));
}

#[tokio::test]
async fn invalid_json_is_parse_error() {
    let server = server(true);
    let response = server.handle_message(&RequestContext::local(), b"{not json").await.unwrap();
    assert_eq!(response.error_code(), Some(PARSE_ERROR));
    assert_eq!(response.id, Value::Null);
}

// ============================================================================
// SECTION: Streamable HTTP
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn mcp_route_answers_with_json() {
    let base = spawn(true).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/mcp"))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["tools"].as_array().map(Vec::len), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn mcp_route_answers_with_single_sse_event() {
    let base = spawn(false).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/mcp"))
        .json(&json!({"jsonrpc": "2.0", "id": 9, "method": "ping"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"));
    let body = response.text().await.unwrap();
    let data: Value = serde_json::from_str(&find_event(&body, "message").unwrap()).unwrap();
    assert_eq!(data["id"], 9);
    assert_eq!(data["result"], json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn mcp_route_accepts_notifications() {
    let base = spawn(true).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/mcp"))
        .json(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 202);
}

#[tokio::test(flavor = "multi_thread")]
async fn mcp_route_rejects_invalid_json() {
    let base = spawn(true).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/mcp"))
        .body("{oops")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], PARSE_ERROR);
}

// ============================================================================
// SECTION: SSE Sessions
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn message_post_to_unknown_session_is_not_found() {
    let base = spawn(true).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/messages/?session_id=missing"))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn sse_session_delivers_replies_on_stream() {
    let base = spawn(true).await;
    let client = reqwest::Client::new();
    let mut stream = client.get(format!("{base}/sse")).send().await.unwrap();
    assert_eq!(stream.status(), 200);

    let mut buffer = String::new();
    let endpoint = read_event(&mut stream, &mut buffer, "endpoint").await;
    assert!(endpoint.starts_with("/messages/?session_id="));

    let accepted = client
        .post(format!("{base}{endpoint}"))
        .json(&json!({"jsonrpc": "2.0", "id": 77, "method": "tools/list"}))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), 202);

    let reply: Value =
        serde_json::from_str(&read_event(&mut stream, &mut buffer, "message").await).unwrap();
    assert_eq!(reply["id"], 77);
    assert_eq!(reply["result"]["tools"].as_array().map(Vec::len), Some(4));
}
