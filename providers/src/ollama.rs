//! Ollama `/api/generate` client.

use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;
use yarrow_types::{GenerateStats, StreamEvent};

use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{MAX_ERROR_BODY_BYTES, MAX_LINE_BUFFER_BYTES, MAX_PARSE_ERRORS, http_client};

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("invalid Ollama base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("could not reach Ollama after {attempts} attempts: {source}")]
    Connection {
        attempts: u32,
        source: reqwest::Error,
    },
    #[error("Ollama API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Ollama reported: {0}")]
    Server(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// One generation request; the model is fixed on the client.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system: String,
    pub temperature: f64,
}

/// Client for a locally running Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Url,
    model: String,
    retry: RetryConfig,
    /// Applied to non-streaming requests only; streams run unbounded.
    request_timeout: Option<Duration>,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, OllamaError> {
        let base_url = Url::parse(base_url).map_err(|source| OllamaError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            model: model.into(),
            retry: RetryConfig::default(),
            request_timeout: None,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base_url.join(path).unwrap_or_else(|_| {
            // A parsed http(s) base always joins a relative path.
            self.base_url.clone()
        })
    }

    /// Whether the server answers at all.
    pub async fn check_connection(&self) -> bool {
        let result = http_client()
            .get(self.base_url.clone())
            .timeout(Duration::from_secs(3))
            .send()
            .await;
        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, url = %self.base_url, "Ollama connection check failed");
                false
            }
        }
    }

    /// Stream a generation, delivering normalized events through `events`.
    ///
    /// Returns `Err` only for failures before the stream starts; once the
    /// response headers are in, problems surface as `StreamEvent::Error`.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        events: &mpsc::Sender<StreamEvent>,
    ) -> Result<(), OllamaError> {
        let url = self.endpoint("api/generate");
        let body = GenerateBody::streaming(self, request);

        let response = self.send(&url, &body).await?;
        tracing::debug!(model = %self.model, "generation stream opened");

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut parse_errors = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    let _ = events
                        .send(StreamEvent::Error(format!("stream read failed: {e}")))
                        .await;
                    return Ok(());
                }
            };
            buffer.extend_from_slice(&chunk);
            if buffer.len() > MAX_LINE_BUFFER_BYTES {
                let _ = events
                    .send(StreamEvent::Error(
                        "stream line exceeded buffer limit".to_string(),
                    ))
                    .await;
                return Ok(());
            }

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                let line = trim_line(&line);
                if line.is_empty() {
                    continue;
                }

                let parsed: GenerateChunk = match serde_json::from_slice(line) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        parse_errors += 1;
                        tracing::debug!("Failed to parse Ollama chunk: {e}");
                        if parse_errors >= MAX_PARSE_ERRORS {
                            let _ = events
                                .send(StreamEvent::Error(format!(
                                    "too many malformed stream chunks: {e}"
                                )))
                                .await;
                            return Ok(());
                        }
                        continue;
                    }
                };

                if let Some(message) = parsed.error {
                    let _ = events.send(StreamEvent::Error(message)).await;
                    return Ok(());
                }
                if !parsed.response.is_empty()
                    && events
                        .send(StreamEvent::TextDelta(parsed.response))
                        .await
                        .is_err()
                {
                    // Receiver hung up; nothing left to deliver to.
                    return Ok(());
                }
                if parsed.done {
                    let _ = events
                        .send(StreamEvent::Done(GenerateStats {
                            total_duration: parsed.total_duration,
                            eval_count: parsed.eval_count,
                        }))
                        .await;
                    return Ok(());
                }
            }
        }

        let _ = events
            .send(StreamEvent::Error(
                "stream ended before completion".to_string(),
            ))
            .await;
        Ok(())
    }

    /// One-shot generation; blocks until the full response is ready.
    pub async fn generate_once(&self, request: &GenerateRequest) -> Result<String, OllamaError> {
        let url = self.endpoint("api/generate");
        let body = GenerateBody::blocking(self, request);

        let response = self.send(&url, &body).await?;
        let parsed: GenerateChunk = response.json().await?;
        if let Some(message) = parsed.error {
            return Err(OllamaError::Server(message));
        }
        Ok(parsed.response)
    }

    async fn send(&self, url: &Url, body: &GenerateBody<'_>) -> Result<reqwest::Response, OllamaError> {
        let outcome = send_with_retry(
            || {
                let mut builder = http_client().post(url.clone()).json(body);
                if let Some(timeout) = self.request_timeout
                    && !body.stream
                {
                    builder = builder.timeout(timeout);
                }
                builder
            },
            &self.retry,
        )
        .await;

        match outcome {
            RetryOutcome::Success(response) => Ok(response),
            RetryOutcome::HttpError(response) => {
                let status = response.status().as_u16();
                let body = read_error_body(response).await;
                Err(OllamaError::Api { status, body })
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                Err(OllamaError::Connection { attempts, source })
            }
        }
    }
}

fn trim_line(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

async fn read_error_body(response: reqwest::Response) -> String {
    match response.bytes().await {
        Ok(bytes) => {
            let truncated = &bytes[..bytes.len().min(MAX_ERROR_BODY_BYTES)];
            String::from_utf8_lossy(truncated).into_owned()
        }
        Err(_) => "<unreadable body>".to_string(),
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
}

impl<'a> GenerateBody<'a> {
    fn streaming(client: &'a OllamaClient, request: &'a GenerateRequest) -> Self {
        Self::new(client, request, true)
    }

    fn blocking(client: &'a OllamaClient, request: &'a GenerateRequest) -> Self {
        Self::new(client, request, false)
    }

    fn new(client: &'a OllamaClient, request: &'a GenerateRequest, stream: bool) -> Self {
        Self {
            model: &client.model,
            prompt: &request.prompt,
            system: &request.system,
            stream,
            options: GenerateOptions {
                temperature: request.temperature,
            },
        }
    }
}

/// One NDJSON line of a generate response.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
    total_duration: Option<u64>,
    eval_count: Option<u64>,
}
