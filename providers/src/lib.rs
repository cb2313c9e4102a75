//! Ollama client with streaming support.
//!
//! # Architecture
//!
//! [`OllamaClient`] talks to a locally running Ollama server over its
//! `/api/generate` endpoint. Responses stream as newline-delimited JSON;
//! the client normalizes each line to a [`StreamEvent`] and delivers events
//! through a [`tokio::sync::mpsc::Sender`], so the caller can print content
//! as it arrives.
//!
//! # Error Handling
//!
//! Failures before the response headers arrive (unreachable server, non-2xx
//! status after retries) are `Result::Err` returns. Failures while reading
//! the body are delivered as `StreamEvent::Error` events instead, allowing
//! partial output to be kept.

pub mod ollama;
pub mod retry;

pub use ollama::{GenerateRequest, OllamaClient, OllamaError};
pub use yarrow_types::{GenerateStats, StreamEvent};

use std::sync::OnceLock;
use std::time::Duration;

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

const CONNECT_TIMEOUT_SECS: u64 = 5;
const TCP_KEEPALIVE_SECS: u64 = 60;

/// Longest a single NDJSON line may grow before the stream is abandoned.
const MAX_LINE_BUFFER_BYTES: usize = 1024 * 1024;

/// Unparsable NDJSON lines tolerated before the stream is abandoned.
const MAX_PARSE_ERRORS: usize = 3;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
                reqwest::Client::new()
            })
    })
}
