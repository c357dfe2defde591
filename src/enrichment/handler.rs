//! HTTP handler for the Enrichment API
//!
//! - POST / — `{message}` in, `{tags, summary}` out

use super::backend::{CompletionBackend, Prompt};
use super::parser::extract_tags_and_summary;
use crate::error::{Error, Result};
use axum::{body::Bytes, extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const GENERATION_FAILED: &str = "Failed to generate tags and summary";

/// Shared state for the enrichment handler
#[derive(Clone)]
pub struct EnrichmentState {
    pub backend: Arc<dyn CompletionBackend>,
}

/// Create the enrichment router
pub fn enrichment_router(state: EnrichmentState) -> Router {
    Router::new()
        .route("/", post(handle_message))
        .with_state(state)
}

/// `{tags, summary}` contract between the enrichment and intake services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub tags: Vec<String>,
    pub summary: String,
}

/// Read a non-empty `message` string from a JSON object body
fn message_from_json(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.as_object()?.get("message") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Run the model over `message` and extract a complete tags/summary pair.
///
/// Backend errors are logged here and surface as `GenerationFailed`.
pub async fn generate_tags_and_summary(
    backend: &dyn CompletionBackend,
    message: &str,
) -> Result<EnrichmentResult> {
    let text = backend
        .complete(&Prompt::for_message(message))
        .await
        .map_err(|e| {
            tracing::error!(backend = backend.name(), "Error calling completion API: {}", e);
            Error::GenerationFailed(GENERATION_FAILED.to_string())
        })?;

    let parsed = extract_tags_and_summary(&text);
    if !parsed.is_complete() {
        tracing::warn!(response = %text, "Model output is missing tags or summary");
        return Err(Error::GenerationFailed(GENERATION_FAILED.to_string()));
    }

    Ok(EnrichmentResult {
        tags: parsed.tags,
        summary: parsed.summary,
    })
}

/// POST /
async fn handle_message(
    State(state): State<EnrichmentState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let message = message_from_json(&body)
        .ok_or_else(|| Error::InvalidPayload("Message is required".to_string()))?;

    tracing::info!("Received message: {}", message);

    let response = generate_tags_and_summary(state.backend.as_ref(), &message).await?;
    Ok(Json(response))
}
