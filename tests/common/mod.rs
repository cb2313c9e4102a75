//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock server that simulates an Ollama endpoint.
pub async fn start_ollama_mock() -> MockServer {
    MockServer::start().await
}

/// Mount the liveness root that `check_connection` probes.
pub async fn mount_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ollama is running"))
        .mount(server)
        .await;
}

/// Mount a streaming generate response: one NDJSON line per chunk, then a
/// terminal done line.
pub async fn mount_generate_stream(server: &MockServer, chunks: &[&str]) {
    let mut body = String::new();
    for chunk in chunks {
        let line = serde_json::json!({ "response": chunk, "done": false });
        body.push_str(&format!("{line}\n"));
    }
    let done = serde_json::json!({
        "response": "",
        "done": true,
        "total_duration": 1_234_567u64,
        "eval_count": 42u64
    });
    body.push_str(&format!("{done}\n"));

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/x-ndjson"),
        )
        .mount(server)
        .await;
}

/// Mount a non-streaming generate response with the full text.
pub async fn mount_generate_once(server: &MockServer, text: &str) {
    let body = serde_json::json!({ "response": text, "done": true });
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a stream that reports a server-side error mid-generation.
pub async fn mount_generate_server_error(server: &MockServer, message: &str) {
    let mut body = String::new();
    let first = serde_json::json!({ "response": "部分", "done": false });
    body.push_str(&format!("{first}\n"));
    let error = serde_json::json!({ "error": message });
    body.push_str(&format!("{error}\n"));

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/x-ndjson"),
        )
        .mount(server)
        .await;
}

/// Mount a generate endpoint that always fails with the given status.
pub async fn mount_generate_http_error(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(status).set_body_string("model not found"))
        .mount(server)
        .await;
}
