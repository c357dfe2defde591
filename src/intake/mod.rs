//! Intake service
//!
//! Accepts `{message, userid, platform}` submissions, has the message
//! enriched by the enrichment service, and keeps the merged
//! `{userid, platform, tags, summary}` records in memory.

pub mod client;
pub mod handler;
pub mod store;
pub mod types;

pub use client::EnrichmentClient;
pub use handler::{intake_router, IntakeState};
pub use store::RecordStore;
pub use types::{EnrichmentResult, StoredRecord, Submission};
