//! Enrichment service
//!
//! Sends a message to a chat-completion model with a fixed tagging
//! instruction, then extracts tags and a summary from the free-text reply.
//!
//! ```text
//! {message} → Prompt → CompletionBackend → text → parse_completion
//!                                                  → apply_urgency_default → {tags, summary}
//! ```

pub mod backend;
pub mod handler;
pub mod parser;

pub use backend::{ChatCompletionBackend, CompletionBackend, Prompt};
pub use handler::{enrichment_router, generate_tags_and_summary, EnrichmentResult, EnrichmentState};
pub use parser::{apply_urgency_default, extract_tags_and_summary, parse_completion, ParsedCompletion};
