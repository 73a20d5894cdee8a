//! All AI/LLM functionality

pub mod client;
pub mod parse;
pub mod prompt_builder;

// Re-export main types for convenience
pub use client::{Completion, LlmClient, estimate_tokens};
pub use parse::parse_summary;
