//! Ollama client — one generate request per advisory run.
//!
//! Streaming responses arrive as newline-delimited JSON objects, each
//! optionally carrying a `response` token and/or a `done` flag. Tokens
//! are forwarded to the caller's sink in arrival order; malformed
//! fragments are skipped without aborting the stream.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use counsel_core::backend::{Backend, GenerateRequest};
use counsel_core::error::BackendError;
use counsel_core::sink::TokenSink;

/// Client for a local Ollama server.
pub struct OllamaClient {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for `base_url` (e.g. `http://localhost:11434`)
    /// with a whole-exchange timeout in seconds.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classify a transport-level reqwest error.
    fn classify(&self, model: &str, e: &reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                model: model.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else if e.is_connect() {
            BackendError::Connection(self.base_url.clone())
        } else {
            BackendError::Network(e.to_string())
        }
    }

    async fn send(
        &self,
        request: &GenerateRequest,
        stream: bool,
    ) -> Result<reqwest::Response, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream,
        };

        debug!(
            model = %request.model,
            prompt_bytes = request.prompt.len(),
            stream,
            "Sending generate request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(&request.model, &e))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            warn!(status, body = %message, "Ollama returned error");
            return Err(BackendError::Api {
                status_code: status,
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Backend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        request: GenerateRequest,
        sink: &mut (dyn TokenSink + Send),
    ) -> Result<String, BackendError> {
        let response = self.send(&request, true).await?;

        let mut byte_stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut full = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = match chunk_result {
                Ok(b) => b,
                Err(e) if e.is_timeout() => {
                    return Err(BackendError::Timeout {
                        model: request.model.clone(),
                        timeout_secs: self.timeout_secs,
                    });
                }
                Err(e) => return Err(BackendError::StreamInterrupted(e.to_string())),
            };

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            if drain_complete_lines(&mut buffer, &mut full, sink) {
                sink.on_done();
                return Ok(full);
            }
        }

        // Stream closed without an explicit done fragment; a final
        // unterminated line may still be sitting in the buffer.
        if !buffer.trim().is_empty() {
            handle_fragment_line(buffer.trim(), &mut full, sink);
        }
        sink.on_done();
        Ok(full)
    }

    async fn complete(&self, request: GenerateRequest) -> Result<String, BackendError> {
        let response = self.send(&request, false).await?;

        let body: GenerateResponse = response.json().await.map_err(|e| BackendError::Api {
            status_code: 200,
            message: format!("Failed to parse response: {e}"),
        })?;

        Ok(body.response.unwrap_or_default())
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify("", &e))?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let models = body["models"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["name"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify("", &e))?;

        Ok(response.status().is_success())
    }
}

/// Process every complete line in `buffer`, forwarding tokens to the
/// sink and appending them to `full`. Returns true once a fragment
/// with `done = true` was seen.
fn drain_complete_lines(
    buffer: &mut String,
    full: &mut String,
    sink: &mut (dyn TokenSink + Send),
) -> bool {
    while let Some(line_end) = buffer.find('\n') {
        let line = buffer[..line_end].trim_end_matches('\r').to_string();
        buffer.drain(..=line_end);

        if handle_fragment_line(&line, full, sink) {
            return true;
        }
    }
    false
}

/// Parse one NDJSON line. Returns true when it carried `done = true`.
/// Malformed lines are skipped silently; the stream may still succeed.
fn handle_fragment_line(
    line: &str,
    full: &mut String,
    sink: &mut (dyn TokenSink + Send),
) -> bool {
    if line.is_empty() {
        return false;
    }

    match serde_json::from_str::<GenerateFragment>(line) {
        Ok(fragment) => {
            if let Some(token) = fragment.response {
                full.push_str(&token);
                sink.on_token(&token);
            }
            fragment.done
        }
        Err(e) => {
            trace!(line = %line, error = %e, "Ignoring unparseable stream fragment");
            false
        }
    }
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// One streamed NDJSON fragment.
#[derive(Debug, Deserialize)]
struct GenerateFragment {
    #[serde(default)]
    response: Option<String>,

    #[serde(default)]
    done: bool,
}

/// The single-object non-streaming response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}
