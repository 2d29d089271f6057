//! Advisory request orchestration for counsel.
//!
//! [`Advisor`] owns the accumulate-then-flush cycle: it validates the
//! brief, composes the fixed system instruction, truncates the
//! accumulated prompt to a safe size, issues exactly one request
//! through the backend seam, streams tokens to the caller's sink, and
//! on success persists the disclaimed result and resets the buffer.

mod advisor;
mod instruction;
mod store;
mod truncate;

pub use advisor::{Advisor, DEFAULT_MAX_PROMPT_BYTES, DISCLAIMER};
pub use instruction::{compose_prompt, compose_system_instruction};
pub use store::ResultStore;
pub use truncate::truncate_utf8;
