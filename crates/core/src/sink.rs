//! Token sinks — observers for streamed response tokens.
//!
//! The orchestrator emits every token to a sink as it arrives, in
//! arrival order. Keeping the sink behind a trait keeps the core free
//! of any display dependency; the CLI plugs in a stdout sink, tests
//! plug in a recording one.

/// Receives response tokens as they arrive.
pub trait TokenSink: Send {
    /// Called once per token, in arrival order.
    fn on_token(&mut self, token: &str);

    /// Called once when the stream completes normally.
    fn on_done(&mut self) {}
}

/// A sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl TokenSink for NullSink {
    fn on_token(&mut self, _token: &str) {}
}

/// A sink that records every token, for tests and batch callers.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub tokens: Vec<String>,
    pub done: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded tokens concatenated in arrival order.
    pub fn text(&self) -> String {
        self.tokens.concat()
    }
}

impl TokenSink for RecordingSink {
    fn on_token(&mut self, token: &str) {
        self.tokens.push(token.to_string());
    }

    fn on_done(&mut self) {
        self.done = true;
    }
}
