//! Prompt accumulation for counsel.
//!
//! [`PromptBuffer`] owns the single growing text buffer that one
//! advisory cycle feeds to the model: heterogeneous analysis outputs
//! go in through [`PromptBuffer::append`] or
//! [`PromptBuffer::load_file`], normalized to text with bounded
//! previews, and the orchestrator drains the buffer when the request
//! succeeds.

mod buffer;
mod loader;

pub use buffer::PromptBuffer;
