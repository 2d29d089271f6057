//! `counsel ask` — Accumulate data and stream an advisory interpretation.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use counsel_advisor::{Advisor, ResultStore};
use counsel_client::OllamaClient;
use counsel_config::AppConfig;
use counsel_core::input::TABLE_PREVIEW_ROWS;
use counsel_core::sink::TokenSink;
use counsel_core::AdvisoryBrief;

pub struct AskArgs {
    pub files: Vec<PathBuf>,
    pub brief: Option<PathBuf>,
    pub background: Option<String>,
    pub question: Option<String>,
    pub model: Option<String>,
    pub text: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Prints each token as it arrives, flushing so output streams.
struct StdoutSink;

impl TokenSink for StdoutSink {
    fn on_token(&mut self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    fn on_done(&mut self) {
        println!();
    }
}

pub async fn run(args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Brief file first, then flag overrides on top.
    let mut brief = match &args.brief {
        Some(path) => counsel_config::load_brief(path)
            .map_err(|e| format!("Failed to load brief: {e}"))?,
        None => AdvisoryBrief::default(),
    };
    if args.background.is_some() {
        brief.data_background = args.background;
    }
    if args.question.is_some() {
        brief.policy_question = args.question;
    }
    if args.model.is_some() {
        brief.model = args.model;
    } else if brief.model.is_none() {
        brief.model = config.default_model.clone();
    }

    let backend = Arc::new(OllamaClient::new(&config.endpoint, config.timeout_secs));
    let result_path = args.output.unwrap_or_else(|| config.result_path.clone());
    let mut advisor = Advisor::new(backend, ResultStore::new(&result_path))
        .with_max_prompt_bytes(config.max_prompt_bytes);

    for path in &args.files {
        advisor.buffer_mut().load_file(path, TABLE_PREVIEW_ROWS).await?;
        eprintln!("  Added {}", path.display());
    }
    for text in &args.text {
        advisor.buffer_mut().append(text.as_str(), "")?;
    }

    let mut sink = StdoutSink;
    advisor.run(&brief, &mut sink).await?;

    eprintln!();
    eprintln!("  Interpretation saved to {}", result_path.display());
    Ok(())
}
