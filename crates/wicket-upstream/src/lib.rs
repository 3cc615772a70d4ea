//! Upstream client for the Wicket gateway
//!
//! Talks the `OpenAI` wire protocol: listing assistants and creating chat
//! completions, non-streaming or streamed. Every upstream call is raced
//! against a wall-clock deadline; streamed completions are only bounded up to
//! stream initiation.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod deadline;
pub mod error;
pub mod protocol;
pub mod trim;
pub mod types;

pub use client::{DeltaStream, OpenAiClient};
pub use error::UpstreamError;
pub use trim::trim_messages;
pub use types::{ChatMessage, ChatRequest, Role};
