//! HTTP handlers for the Intake API
//!
//! - POST /new — validate, enrich via the enrichment service, store
//! - GET  /get — list every stored record

use super::client::EnrichmentClient;
use super::store::RecordStore;
use super::types::{StoredRecord, Submission};
use crate::error::{Error, Result};
use axum::{
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

/// Shared state for intake handlers
#[derive(Clone)]
pub struct IntakeState {
    pub store: RecordStore,
    pub enrichment: EnrichmentClient,
}

/// Create the intake router
pub fn intake_router(state: IntakeState) -> Router {
    Router::new()
        .route("/new", post(new_message))
        .route("/get", get(get_records))
        .with_state(state)
}

/// POST /new
async fn new_message(
    State(state): State<IntakeState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let submission = Submission::from_json(&body)
        .ok_or_else(|| Error::InvalidPayload("Invalid payload".to_string()))?;

    let enrichment = state
        .enrichment
        .enrich(&submission.message)
        .await
        .map_err(|e| {
            tracing::warn!(userid = %submission.userid, "Enrichment failed: {}", e);
            e
        })?;

    let record = StoredRecord::new(submission, enrichment);
    tracing::info!(
        userid = %record.userid,
        platform = %record.platform,
        tags = ?record.tags,
        "Stored record"
    );
    state.store.append(record).await;

    Ok(Json(serde_json::json!({ "status": "success" })))
}

/// GET /get
async fn get_records(State(state): State<IntakeState>) -> impl IntoResponse {
    Json(state.store.list().await)
}
