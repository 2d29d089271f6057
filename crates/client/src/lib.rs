//! HTTP client for the local Ollama text-generation service.
//!
//! Implements the `counsel_core::Backend` trait over Ollama's
//! `/api/generate` endpoint, in streaming (newline-delimited JSON
//! fragments) and non-streaming mode.

mod ollama;

pub use ollama::OllamaClient;
