//! # Counsel Core
//!
//! Domain types, traits, and error definitions for the counsel
//! advisory toolkit. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement
//! against.
//!
//! ## Design Philosophy
//!
//! The two seams of the system are defined as traits here: the
//! [`Backend`] that talks to the text-generation service, and the
//! [`TokenSink`] that observes streamed tokens. Implementations live
//! in their respective crates. This enables:
//! - Testing the orchestration without a network or a display
//! - Swapping implementations via configuration
//! - A clean dependency graph (all crates depend inward on core)

pub mod advisory;
pub mod backend;
pub mod error;
pub mod input;
pub mod sink;

// Re-export key types at crate root for ergonomics
pub use advisory::AdvisoryBrief;
pub use backend::{Backend, GenerateRequest};
pub use error::{AdvisoryError, BackendError, Error, InputError, Result};
pub use input::{InputValue, PromptSource, Series, Table};
pub use sink::{NullSink, RecordingSink, TokenSink};
