//! Intake request and record types

pub use crate::enrichment::EnrichmentResult;
use serde::{Deserialize, Serialize};

/// A validated submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub message: String,
    pub userid: String,
    pub platform: String,
}

impl Submission {
    /// Parse a `POST /new` body.
    ///
    /// The body must be a JSON object whose `message`, `userid` and
    /// `platform` are all non-empty strings.
    pub fn from_json(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let fields = value.as_object()?;
        Some(Self {
            message: non_empty_string(fields, "message")?,
            userid: non_empty_string(fields, "userid")?,
            platform: non_empty_string(fields, "platform")?,
        })
    }
}

fn non_empty_string(
    fields: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    match fields.get(key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// A submission merged with its enrichment, as kept in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub userid: String,
    pub platform: String,
    pub tags: Vec<String>,
    pub summary: String,
}

impl StoredRecord {
    pub fn new(submission: Submission, enrichment: EnrichmentResult) -> Self {
        Self {
            userid: submission.userid,
            platform: submission.platform,
            tags: enrichment.tags,
            summary: enrichment.summary,
        }
    }
}
