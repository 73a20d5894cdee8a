//! All Slack-specific functionality

pub mod client;
pub mod message_formatter;

// Re-export main types for convenience
pub use client::{PostMessageResponse, SlackClient};
pub use message_formatter::{build_payloads, create_summary_blocks, digest_title};
