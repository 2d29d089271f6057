//! End-to-end integration tests for the counsel advisory pipeline.
//!
//! These tests exercise the full flow from data accumulation to the
//! persisted result: file loading, inline appends, brief validation,
//! streamed token delivery, and the disclaimed document on disk.

use std::sync::Arc;

use counsel_advisor::{Advisor, DISCLAIMER, ResultStore};
use counsel_core::backend::{Backend, GenerateRequest};
use counsel_core::error::{AdvisoryError, BackendError, Error};
use counsel_core::input::{TABLE_PREVIEW_ROWS, Table};
use counsel_core::sink::{RecordingSink, TokenSink};
use counsel_core::AdvisoryBrief;

// ── Mock Backend ─────────────────────────────────────────────────────────

/// A mock backend that streams scripted tokens and records the request.
struct ScriptedBackend {
    tokens: Vec<&'static str>,
    failure: Option<BackendError>,
    requests: std::sync::Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
    fn tokens(tokens: Vec<&'static str>) -> Self {
        Self {
            tokens,
            failure: None,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn failing(failure: BackendError) -> Self {
        Self {
            tokens: Vec::new(),
            failure: Some(failure),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> GenerateRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn generate(
        &self,
        request: GenerateRequest,
        sink: &mut (dyn TokenSink + Send),
    ) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request);
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

    async fn complete(&self, request: GenerateRequest) -> Result<String, BackendError> {
        let mut sink = counsel_core::sink::NullSink;
        self.generate(request, &mut sink).await
    }
}

fn brief() -> AdvisoryBrief {
    AdvisoryBrief::new(
        "Monthly hotel occupancy data for a mid-size city",
        "Should we raise the tourism tax next quarter?",
        "qwen3:14b",
    )
}

// ── E2E: Full Advisory Pipeline ──────────────────────────────────────────

#[tokio::test]
async fn e2e_accumulate_stream_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("occupancy.csv");
    std::fs::write(&csv_path, "month,rate\njan,0.71\nfeb,0.78\n").unwrap();

    let backend = Arc::new(ScriptedBackend::tokens(vec![
        "Occupancy ",
        "is ",
        "trending ",
        "up.",
    ]));
    let result_path = dir.path().join("interpretation.md");
    let mut advisor = Advisor::new(backend.clone(), ResultStore::new(&result_path));

    // Accumulate from a file, an inline value, and a table.
    advisor
        .buffer_mut()
        .load_file(&csv_path, TABLE_PREVIEW_ROWS)
        .await
        .unwrap();
    let mean = advisor
        .buffer_mut()
        .append(vec![0.71_f64, 0.78], "rates:")
        .unwrap()
        .iter()
        .sum::<f64>()
        / 2.0;
    advisor
        .buffer_mut()
        .append(mean, "mean occupancy:")
        .unwrap();

    let mut table = Table::new(vec!["quarter".into(), "revenue".into()]);
    table.push_row(vec!["Q1".into(), "1.2M".into()]);
    advisor.buffer_mut().append(table, "revenue by quarter").unwrap();

    let mut sink = RecordingSink::new();
    let result = advisor.run(&brief(), &mut sink).await.unwrap();

    // Tokens arrive in order and the result is the disclaimed whole.
    assert_eq!(sink.tokens, vec!["Occupancy ", "is ", "trending ", "up."]);
    assert!(sink.done);
    assert_eq!(
        result,
        format!("{DISCLAIMER}Occupancy is trending up.")
    );

    // Exactly one request, carrying everything accumulated.
    assert_eq!(backend.calls(), 1);
    let request = backend.last_request();
    assert_eq!(request.model, "qwen3:14b");
    assert!(request.prompt.contains("Monthly hotel occupancy data"));
    assert!(request.prompt.contains("raise the tourism tax"));
    assert!(request.prompt.contains("User data: "));
    assert!(request.prompt.contains("jan"));
    assert!(request.prompt.contains("rates: 0.71 0.78"));
    assert!(request.prompt.contains("revenue by quarter"));

    // Persisted document matches the returned result; buffer is reset.
    let persisted = std::fs::read_to_string(&result_path).unwrap();
    assert_eq!(persisted, result);
    assert!(advisor.buffer().is_empty());
}

#[tokio::test]
async fn e2e_second_run_overwrites_first() {
    let dir = tempfile::tempdir().unwrap();
    let result_path = dir.path().join("interpretation.md");

    let backend = Arc::new(ScriptedBackend::tokens(vec!["first pass"]));
    let mut advisor = Advisor::new(backend, ResultStore::new(&result_path));
    advisor.buffer_mut().append("round one", "").unwrap();
    advisor
        .run(&brief(), &mut RecordingSink::new())
        .await
        .unwrap();

    let backend = Arc::new(ScriptedBackend::tokens(vec!["second pass"]));
    let mut advisor = Advisor::new(backend, ResultStore::new(&result_path));
    advisor.buffer_mut().append("round two", "").unwrap();
    advisor
        .run(&brief(), &mut RecordingSink::new())
        .await
        .unwrap();

    let persisted = std::fs::read_to_string(&result_path).unwrap();
    assert!(persisted.ends_with("second pass"));
    assert!(!persisted.contains("first pass"));
}

#[tokio::test]
async fn e2e_backend_failure_keeps_buffer_and_disk_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let result_path = dir.path().join("interpretation.md");

    let backend = Arc::new(ScriptedBackend::failing(BackendError::Connection(
        "http://localhost:11434".into(),
    )));
    let mut advisor = Advisor::new(backend, ResultStore::new(&result_path));
    advisor.buffer_mut().append("expensive analysis", "").unwrap();
    let before = advisor.buffer().as_str().to_string();

    let err = advisor
        .run(&brief(), &mut RecordingSink::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Backend(BackendError::Connection(_))));
    assert_eq!(advisor.buffer().as_str(), before);
    assert!(!result_path.exists());
}

#[tokio::test]
async fn e2e_incomplete_brief_never_reaches_backend() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::tokens(vec!["unreachable"]));
    let mut advisor = Advisor::new(
        backend.clone(),
        ResultStore::new(dir.path().join("out.md")),
    );
    advisor.buffer_mut().append("data", "").unwrap();

    let partial = AdvisoryBrief {
        model: Some("qwen3:14b".into()),
        ..Default::default()
    };
    let err = advisor
        .run(&partial, &mut RecordingSink::new())
        .await
        .unwrap_err();

    match err {
        Error::Advisory(AdvisoryError::IncompleteConfig { missing }) => {
            assert_eq!(missing, vec!["data_background", "policy_question"]);
        }
        other => panic!("expected IncompleteConfig, got {other:?}"),
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn e2e_unsupported_file_is_rejected_before_buffering() {
    let dir = tempfile::tempdir().unwrap();
    let bad_path = dir.path().join("data.parquet");
    std::fs::write(&bad_path, "not really parquet").unwrap();

    let backend = Arc::new(ScriptedBackend::tokens(vec![]));
    let mut advisor = Advisor::new(backend, ResultStore::new(dir.path().join("out.md")));

    let err = advisor
        .buffer_mut()
        .load_file(&bad_path, TABLE_PREVIEW_ROWS)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("parquet"));
    assert!(advisor.buffer().is_empty());
}
