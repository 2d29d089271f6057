//! The append-only prompt buffer.

use counsel_core::error::InputError;
use counsel_core::input::PromptSource;

/// The accumulated prompt for one advisory cycle.
///
/// Content order equals append order; nothing is reordered or
/// deduplicated. The buffer is cleared exactly once, by the
/// orchestrator, after a successful advisory run — failures leave it
/// intact so the caller can retry without re-accumulating.
#[derive(Debug, Default)]
pub struct PromptBuffer {
    buf: String,
}

impl PromptBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `value` and append it, followed by a line terminator.
    ///
    /// A non-empty `label` is prepended to the rendered text (leading
    /// token for scalars and sequences, leading line for tables,
    /// series, and mappings). Returns the original value unchanged, so
    /// the call composes inline around other expressions:
    ///
    /// ```
    /// # use counsel_prompt::PromptBuffer;
    /// # fn mean(xs: &[f64]) -> f64 { xs.iter().sum::<f64>() / xs.len() as f64 }
    /// # let mut buffer = PromptBuffer::new();
    /// let avg = mean(&buffer.append(vec![3.0, 4.0, 5.0], "stays:").unwrap());
    /// assert_eq!(avg, 4.0);
    /// assert_eq!(buffer.as_str(), "stays: 3.0 4.0 5.0\n");
    /// ```
    pub fn append<T: PromptSource>(&mut self, value: T, label: &str) -> Result<T, InputError> {
        let block = value.to_input().render(label)?;
        self.buf.push_str(&block);
        self.buf.push('\n');
        Ok(value)
    }

    /// Append already-rendered text verbatim, followed by a line
    /// terminator. Used by the file loader.
    pub(crate) fn push_block(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// The accumulated content.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Byte length of the accumulated content.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reset to empty. Called by the orchestrator on the success path
    /// only.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
