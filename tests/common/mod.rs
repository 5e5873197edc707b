//! Common test utilities for integration tests.
//!
//! Helpers for standing up a wiremock backend and building SSE bodies.

#![allow(dead_code)]

use ragchat::api::ApiClient;
use ragchat::config::ApiConfig;
use serde_json::Value;
use wiremock::MockServer;

/// Format one event as an SSE frame.
pub fn sse_frame(event: &Value) -> String {
    format!("data: {}\n\n", event)
}

/// Concatenate frames for several events.
pub fn sse_body(events: &[Value]) -> String {
    events.iter().map(sse_frame).collect()
}

/// Start a mock backend.
pub async fn start_backend() -> MockServer {
    MockServer::start().await
}

/// Build a real (reqwest-backed) client pointed at the mock backend.
pub fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new().with_base_url(server.uri());
    ApiClient::from_config(&config).expect("Failed to build client")
}
