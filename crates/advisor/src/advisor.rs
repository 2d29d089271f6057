//! The advisory orchestrator.

use std::sync::Arc;

use counsel_core::backend::{Backend, GenerateRequest};
use counsel_core::error::{AdvisoryError, Result};
use counsel_core::sink::TokenSink;
use counsel_core::AdvisoryBrief;
use counsel_prompt::PromptBuffer;
use tracing::{info, warn};

use crate::instruction::{compose_prompt, compose_system_instruction};
use crate::store::ResultStore;
use crate::truncate::truncate_utf8;

/// Maximum prompt size sent to the model, in UTF-8 bytes.
pub const DEFAULT_MAX_PROMPT_BYTES: usize = 32_000;

/// Fixed text prefixed to every advisory result. Part of the external
/// contract: callers and downstream documents rely on this exact
/// wording.
pub const DISCLAIMER: &str = "----- Disclaimer: This interpretation was produced by a \
Large Language Model running locally via Ollama, which generates answers based on the \
text it was trained on. Therefore the answers may contain errors. It is important to \
verify the information with a domain expert before making any decisions. The AI Policy \
Advisor is meant to be a cheap, immediate, first-pass at interpreting data for policy \
and decision-making purposes. -----

## AI Policy Advisor
";

/// Owns one prompt buffer and issues one advisory request at a time.
///
/// Construct it, feed the buffer through [`Advisor::buffer_mut`], then
/// call [`Advisor::run`]. On success the buffer is reset; on any
/// failure it is left intact so the caller can retry without
/// re-accumulating.
pub struct Advisor {
    backend: Arc<dyn Backend>,
    buffer: PromptBuffer,
    store: ResultStore,
    max_prompt_bytes: usize,
}

impl Advisor {
    pub fn new(backend: Arc<dyn Backend>, store: ResultStore) -> Self {
        Self {
            backend,
            buffer: PromptBuffer::new(),
            store,
            max_prompt_bytes: DEFAULT_MAX_PROMPT_BYTES,
        }
    }

    /// Override the prompt byte cap.
    pub fn with_max_prompt_bytes(mut self, max_prompt_bytes: usize) -> Self {
        self.max_prompt_bytes = max_prompt_bytes;
        self
    }

    /// The prompt buffer, for accumulation.
    pub fn buffer_mut(&mut self) -> &mut PromptBuffer {
        &mut self.buffer
    }

    pub fn buffer(&self) -> &PromptBuffer {
        &self.buffer
    }

    /// Run one advisory request: validate the brief, compose and
    /// truncate the prompt, stream the model's response into `sink`,
    /// persist the disclaimed result, and reset the buffer.
    pub async fn run(
        &mut self,
        brief: &AdvisoryBrief,
        sink: &mut (dyn TokenSink + Send),
    ) -> Result<String> {
        if brief.is_empty() {
            return Err(AdvisoryError::MissingConfig.into());
        }

        let missing = brief.missing_keys();
        if !missing.is_empty() {
            return Err(AdvisoryError::IncompleteConfig { missing }.into());
        }

        // An advisory request with no data is meaningless.
        if self.buffer.is_empty() {
            return Err(AdvisoryError::EmptyPrompt.into());
        }

        let model = brief.model.as_deref().unwrap_or_default();
        if model.is_empty() {
            return Err(AdvisoryError::MissingModel.into());
        }

        if brief.data_background.as_deref().unwrap_or_default().is_empty() {
            warn!(
                "For better results, provide some background about the data \
                 (data_background)"
            );
        }
        if brief.policy_question.as_deref().unwrap_or_default().is_empty() {
            warn!(
                "For a specific policy or decision-making answer, set a \
                 policy_question"
            );
        }

        let system_instruction = compose_system_instruction(brief);
        let user_data = truncate_utf8(self.buffer.as_str(), self.max_prompt_bytes);
        if user_data.len() < self.buffer.len() {
            info!(
                buffer_bytes = self.buffer.len(),
                sent_bytes = user_data.len(),
                "Prompt truncated to byte cap"
            );
        }
        let prompt = compose_prompt(&system_instruction, user_data);

        let request = GenerateRequest::new(model, prompt);
        let full_response = self.backend.generate(request, sink).await?;

        let interpretation = format!("{DISCLAIMER}{full_response}");
        self.store.persist(&interpretation).await?;
        self.buffer.clear();

        info!(
            result = %self.store.path().display(),
            response_bytes = full_response.len(),
            "Advisory persisted"
        );
        Ok(interpretation)
    }
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("backend", &self.backend.name())
            .field("buffer_bytes", &self.buffer.len())
            .field("store", &self.store)
            .field("max_prompt_bytes", &self.max_prompt_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_core::error::{BackendError, Error};
    use counsel_core::sink::RecordingSink;
    use std::sync::Mutex;

    /// Backend double: replays scripted tokens or fails, and records
    /// the request it was given.
    struct ScriptedBackend {
        tokens: Vec<&'static str>,
        failure: Option<BackendError>,
        last_request: Mutex<Option<GenerateRequest>>,
    }

    impl ScriptedBackend {
        fn tokens(tokens: Vec<&'static str>) -> Self {
            Self {
                tokens,
                failure: None,
                last_request: Mutex::new(None),
            }
        }

        fn failing(failure: BackendError) -> Self {
            Self {
                tokens: Vec::new(),
                failure: Some(failure),
                last_request: Mutex::new(None),
            }
        }

        fn last_prompt(&self) -> Option<String> {
            self.last_request
                .lock()
                .unwrap()
                .as_ref()
                .map(|r| r.prompt.clone())
        }
    }

    #[async_trait::async_trait]
    impl Backend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            request: GenerateRequest,
            sink: &mut (dyn TokenSink + Send),
        ) -> std::result::Result<String, BackendError> {
            *self.last_request.lock().unwrap() = Some(request);
            if let Some(failure) = &self.failure {
                return Err(failure.clone());
            }
            let mut full = String::new();
            for token in &self.tokens {
                sink.on_token(token);
                full.push_str(token);
            }
            sink.on_done();
            Ok(full)
        }

        async fn complete(
            &self,
            request: GenerateRequest,
        ) -> std::result::Result<String, BackendError> {
            let mut sink = counsel_core::sink::NullSink;
            self.generate(request, &mut sink).await
        }
    }

    fn advisor_with(backend: Arc<ScriptedBackend>, dir: &tempfile::TempDir) -> Advisor {
        Advisor::new(backend, ResultStore::new(dir.path().join("result.md")))
    }

    fn valid_brief() -> AdvisoryBrief {
        AdvisoryBrief::new("test background", "test question", "qwen3:14b")
    }

    #[tokio::test]
    async fn empty_brief_fails_listing_all_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut advisor = advisor_with(Arc::new(ScriptedBackend::tokens(vec![])), &dir);
        let mut sink = RecordingSink::new();

        let err = advisor
            .run(&AdvisoryBrief::default(), &mut sink)
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("data_background"));
        assert!(msg.contains("policy_question"));
        assert!(msg.contains("model"));
    }

    #[tokio::test]
    async fn incomplete_brief_names_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut advisor = advisor_with(Arc::new(ScriptedBackend::tokens(vec![])), &dir);
        let mut sink = RecordingSink::new();

        let brief = AdvisoryBrief {
            data_background: Some("x".into()),
            ..Default::default()
        };
        let err = advisor.run(&brief, &mut sink).await.unwrap_err();
        match err {
            Error::Advisory(AdvisoryError::IncompleteConfig { missing }) => {
                assert_eq!(missing, vec!["policy_question", "model"]);
            }
            other => panic!("expected IncompleteConfig, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_buffer_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::tokens(vec!["never"]));
        let mut advisor = advisor_with(backend.clone(), &dir);
        let mut sink = RecordingSink::new();

        let err = advisor.run(&valid_brief(), &mut sink).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Advisory(AdvisoryError::EmptyPrompt)
        ));
        assert!(backend.last_prompt().is_none());
    }

    #[tokio::test]
    async fn empty_model_string_fails_with_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut advisor = advisor_with(Arc::new(ScriptedBackend::tokens(vec![])), &dir);
        advisor.buffer_mut().append("data", "").unwrap();
        let mut sink = RecordingSink::new();

        let brief = AdvisoryBrief::new("bg", "q", "");
        let err = advisor.run(&brief, &mut sink).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Advisory(AdvisoryError::MissingModel)
        ));
    }

    #[tokio::test]
    async fn successful_run_streams_persists_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::tokens(vec!["Hel", "lo"]));
        let mut advisor = advisor_with(backend.clone(), &dir);
        advisor.buffer_mut().append("occupancy 0.82", "q3:").unwrap();
        let mut sink = RecordingSink::new();

        let result = advisor.run(&valid_brief(), &mut sink).await.unwrap();

        assert!(result.starts_with(DISCLAIMER));
        assert!(result.ends_with("Hello"));
        assert_eq!(sink.tokens, vec!["Hel", "lo"]);
        assert!(sink.done);
        assert!(advisor.buffer().is_empty());

        let persisted = std::fs::read_to_string(dir.path().join("result.md")).unwrap();
        assert_eq!(persisted, result);

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("test background"));
        assert!(prompt.contains("test question"));
        assert!(prompt.contains("User data: q3: occupancy 0.82"));
    }

    #[tokio::test]
    async fn failed_run_preserves_buffer_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Connection(
            "http://localhost:11434".into(),
        )));
        let mut advisor = advisor_with(backend, &dir);
        advisor.buffer_mut().append("precious data", "").unwrap();
        let before = advisor.buffer().as_str().to_string();
        let mut sink = RecordingSink::new();

        let err = advisor.run(&valid_brief(), &mut sink).await.unwrap_err();
        assert!(matches!(err, Error::Backend(BackendError::Connection(_))));
        assert_eq!(advisor.buffer().as_str(), before);
        assert!(!dir.path().join("result.md").exists());
    }

    #[tokio::test]
    async fn oversized_buffer_is_truncated_at_char_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::tokens(vec!["ok"]));
        let mut advisor =
            advisor_with(backend.clone(), &dir).with_max_prompt_bytes(100);
        // 2-byte chars; 3 per append plus label-free newline.
        for _ in 0..40 {
            advisor.buffer_mut().append("ééé", "").unwrap();
        }
        assert!(advisor.buffer().len() > 100);
        let mut sink = RecordingSink::new();

        advisor.run(&valid_brief(), &mut sink).await.unwrap();

        let prompt = backend.last_prompt().unwrap();
        let user_data = prompt.split("User data: ").nth(1).unwrap();
        assert!(user_data.len() <= 100);
        assert!(user_data.is_char_boundary(user_data.len()));
    }

    #[tokio::test]
    async fn empty_optional_fields_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::tokens(vec!["fine"]));
        let mut advisor = advisor_with(backend, &dir);
        advisor.buffer_mut().append("data", "").unwrap();
        let mut sink = RecordingSink::new();

        let brief = AdvisoryBrief::new("", "", "qwen3:14b");
        let result = advisor.run(&brief, &mut sink).await.unwrap();
        assert!(result.ends_with("fine"));
    }
}
