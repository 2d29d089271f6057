//! Error types for the counsel domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all counsel operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Advisory (pre-network validation) errors ---
    #[error("Advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    // --- Input normalization errors ---
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    // --- Model backend errors ---
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- I/O (result persistence) ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Instructional message shown when no brief is supplied at all.
/// User-facing guidance, so it names every required key and shows usage.
pub const MISSING_BRIEF_HELP: &str = "\
An advisory brief is required. Provide all three keys:

    data_background  = \"Brief description of what your data represents\"
    policy_question  = \"What specific question are you trying to answer?\"
    model            = \"Which Ollama model to use (e.g. 'qwen3:14b')\"

Put them in a brief.toml and pass it with --brief, or supply
--background/--question/--model flags directly.";

// --- Bounded context errors ---

/// Failures detected synchronously before any network call.
/// Always fatal to the current run, never retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdvisoryError {
    #[error("{MISSING_BRIEF_HELP}")]
    MissingConfig,

    #[error(
        "advisory brief is missing required keys: {missing:?} — \
         a brief must include data_background, policy_question, and model"
    )]
    IncompleteConfig { missing: Vec<String> },

    #[error(
        "no model specified — set the 'model' key in the brief \
         to an Ollama model name (e.g. 'qwen3:14b')"
    )]
    MissingModel,

    #[error(
        "the prompt buffer is empty — accumulate some data \
         before requesting an advisory"
    )]
    EmptyPrompt,
}

/// Failures raised by accumulator operations. Fatal to that single
/// append/load call; previously accumulated content is unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error(
        "invalid input shape: {0} — use text, sequences, tables, \
         series, or mappings"
    )]
    InvalidInputType(String),

    #[error(
        "unsupported file type: {path} — expected a delimited file \
         (.csv, .tsv) or a text file (.md, .markdown, .txt)"
    )]
    UnsupportedFileType { path: String },

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Failures from the model backend, classified so the caller can
/// render the right remediation. The buffer is preserved on all of
/// these so the caller can retry without re-accumulating.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error(
        "could not connect to the model server at {0} — make sure \
         Ollama is installed and running (check with: ollama list)"
    )]
    Connection(String),

    #[error(
        "model '{model}' did not respond within {timeout_secs}s — \
         try a smaller/faster model, send less data at once, or free \
         up RAM/GPU memory"
    )]
    Timeout { model: String, timeout_secs: u64 },

    #[error(
        "generate request failed with status {status_code}: {message} — \
         make sure the model is available; you may be sending too much \
         data at once"
    )]
    Api { status_code: u16, message: String },

    #[error("response stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_lists_all_required_keys() {
        let msg = Error::Advisory(AdvisoryError::MissingConfig).to_string();
        assert!(msg.contains("data_background"));
        assert!(msg.contains("policy_question"));
        assert!(msg.contains("model"));
    }

    #[test]
    fn incomplete_config_names_missing_keys() {
        let err = AdvisoryError::IncompleteConfig {
            missing: vec!["policy_question".into(), "model".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("policy_question"));
        assert!(msg.contains("model"));
        assert!(!msg.contains("\"data_background\""));
    }

    #[test]
    fn timeout_error_carries_remediation() {
        let err = BackendError::Timeout {
            model: "qwen3:14b".into(),
            timeout_secs: 420,
        };
        let msg = err.to_string();
        assert!(msg.contains("qwen3:14b"));
        assert!(msg.contains("420"));
        assert!(msg.contains("smaller/faster model"));
    }

    #[test]
    fn api_error_displays_status() {
        let err = Error::Backend(BackendError::Api {
            status_code: 500,
            message: "internal error".into(),
        });
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn connection_error_mentions_ollama() {
        let err = BackendError::Connection("http://localhost:11434".into());
        assert!(err.to_string().contains("ollama list"));
        assert!(err.to_string().contains("http://localhost:11434"));
    }
}
