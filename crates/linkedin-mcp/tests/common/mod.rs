// crates/linkedin-mcp/tests/common/mod.rs
// ============================================================================
// Module: LinkedIn MCP Test Helpers
// Description: Stand-in LinkedIn API and router builders.
// Purpose: Exercise the client and tools without network access.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use linkedin_mcp::LinkedInClient;
use linkedin_mcp::LinkedInConfig;
use linkedin_mcp::ToolRouter;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Base URL nothing listens on; calls that reach it fail.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";
/// Token configured on routers built by these helpers.
pub const CONFIGURED_TOKEN: &str = "configured-token";

/// Request observed by the stand-in API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub restli_version: Option<String>,
    pub body: String,
}

/// Canned reply.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Stand-in LinkedIn API answering a fixed sequence of requests.
pub struct MockLinkedIn {
    pub base_url: String,
    requests: mpsc::Receiver<RecordedRequest>,
    handle: thread::JoinHandle<()>,
}

impl MockLinkedIn {
    /// Stops serving and returns the requests seen.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().expect("mock server thread");
        self.requests.try_iter().collect()
    }
}

/// Spawns a server replying with `responses` in order.
pub fn spawn_linkedin(responses: Vec<MockResponse>) -> MockLinkedIn {
    let server = Server::http("127.0.0.1:0").expect("bind mock server");
    let addr = server.server_addr().to_ip().expect("ip listener");
    let (sender, requests) = mpsc::channel();
    let handle = thread::spawn(move || {
        for reply in responses {
            let Ok(Some(mut request)) = server.recv_timeout(Duration::from_secs(5)) else {
                return;
            };
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv(name))
                    .map(|header| header.value.as_str().to_string())
            };
            let authorization = header("Authorization");
            let restli_version = header("X-Restli-Protocol-Version");
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let _ = sender.send(RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization,
                restli_version,
                body,
            });
            let mut response = Response::from_string(reply.body).with_status_code(reply.status);
            for (name, value) in &reply.headers {
                let header =
                    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("valid header");
                response = response.with_header(header);
            }
            let _ = request.respond(response);
        }
    });
    MockLinkedIn {
        base_url: format!("http://{addr}"),
        requests,
        handle,
    }
}

/// Client pointed at `base_url`.
pub fn client(base_url: &str) -> LinkedInClient {
    LinkedInClient::new(LinkedInConfig {
        base_url: base_url.to_string(),
        ..LinkedInConfig::default()
    })
    .expect("client")
}

/// Router pointed at `base_url` with the configured token.
pub fn router(base_url: &str) -> ToolRouter {
    ToolRouter::new(client(base_url), CONFIGURED_TOKEN)
}

/// Canned `/v2/userinfo` reply.
pub fn userinfo(sub: &str) -> MockResponse {
    MockResponse::json(
        200,
        serde_json::json!({
            "sub": sub,
            "name": "Ada Lovelace",
            "given_name": "Ada",
            "family_name": "Lovelace",
            "email": "ada@example.com",
            "picture": "https://media.example.com/ada.png"
        }),
    )
}
