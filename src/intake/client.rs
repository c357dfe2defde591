//! HTTP client for the enrichment service contract

use super::types::EnrichmentResult;
use crate::error::{Error, Result};
use std::time::Duration;

/// Sends `{message}` to the enrichment service and validates its reply
#[derive(Clone)]
pub struct EnrichmentClient {
    client: reqwest::Client,
    url: String,
}

impl EnrichmentClient {
    /// Create a client for the given enrichment endpoint
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request tags and a summary for `message`
    pub async fn enrich(&self, message: &str) -> Result<EnrichmentResult> {
        let payload = serde_json::json!({ "message": message });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                Error::UpstreamUnavailable(format!(
                    "Failed to send message to {}: {}",
                    self.url, e
                ))
            })?;

        let body = response.bytes().await.map_err(|e| {
            Error::UpstreamUnavailable(format!(
                "Failed to send message to {}: {}",
                self.url, e
            ))
        })?;

        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|_| {
            Error::UpstreamMalformed(format!("Invalid JSON response from {}", self.url))
        })?;

        extract_result(&value).ok_or_else(|| {
            Error::UpstreamMalformed(format!(
                "Invalid response from {}: missing tags or summary",
                self.url
            ))
        })
    }
}

/// Pull non-empty `tags` (list of strings) and `summary` out of a reply body
fn extract_result(value: &serde_json::Value) -> Option<EnrichmentResult> {
    let tags: Vec<String> = value
        .get("tags")?
        .as_array()?
        .iter()
        .map(|t| t.as_str().map(str::to_string))
        .collect::<Option<_>>()?;
    let summary = value.get("summary")?.as_str()?.to_string();

    if tags.is_empty() || summary.is_empty() {
        return None;
    }
    Some(EnrichmentResult { tags, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_result() {
        let result = extract_result(&json!({
            "tags": ["refund", "urgent"],
            "summary": "Wants a refund."
        }))
        .unwrap();
        assert_eq!(result.tags, vec!["refund", "urgent"]);
        assert_eq!(result.summary, "Wants a refund.");
    }

    #[test]
    fn test_extract_result_rejects_missing_or_empty() {
        assert!(extract_result(&json!({"tags": ["a"]})).is_none());
        assert!(extract_result(&json!({"summary": "s"})).is_none());
        assert!(extract_result(&json!({"tags": [], "summary": "s"})).is_none());
        assert!(extract_result(&json!({"tags": ["a"], "summary": ""})).is_none());
        assert!(extract_result(&json!({"tags": "a", "summary": "s"})).is_none());
        assert!(extract_result(&json!({"tags": [1, 2], "summary": "s"})).is_none());
        assert!(extract_result(&json!(["tags", "summary"])).is_none());
    }

    #[tokio::test]
    async fn test_enrich_unreachable() {
        // Bind then drop to get a local port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = EnrichmentClient::new(format!("http://{}", addr), None).unwrap();
        let err = client.enrich("hello").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
        assert!(err.to_string().starts_with("Failed to send message to http://"));
    }
}
