//! Backend trait — the abstraction over the text-generation service.
//!
//! The orchestrator issues exactly one request per advisory run
//! through this seam. The HTTP client implements it; tests substitute
//! a scripted backend so the orchestration logic runs without a
//! network.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::sink::TokenSink;

/// A single generate request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "qwen3:14b").
    pub model: String,

    /// Full prompt: system instruction + separator + user data.
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// The text-generation backend.
///
/// `generate` streams: each token is forwarded to the sink in arrival
/// order, and the concatenated full response is returned once the
/// stream finishes. `complete` is the non-streaming variant.
#[async_trait]
pub trait Backend: Send + Sync {
    /// A human-readable name for this backend (e.g. "ollama").
    fn name(&self) -> &str;

    /// Issue one streaming request; returns the full response text.
    async fn generate(
        &self,
        request: GenerateRequest,
        sink: &mut (dyn TokenSink + Send),
    ) -> Result<String, BackendError>;

    /// Issue one non-streaming request; returns the full response text.
    async fn complete(&self, request: GenerateRequest) -> Result<String, BackendError>;

    /// List the models the backend has available.
    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        Ok(Vec::new())
    }

    /// Health check — can we reach the backend?
    async fn health_check(&self) -> Result<bool, BackendError> {
        Ok(true)
    }
}
