//! Messenger webhook
//!
//! Implements the page-webhook handshake used by Facebook Messenger:
//! - GET  /webhook — subscription verification (`hub.mode`, `hub.verify_token`, `hub.challenge`)
//! - POST /webhook — page event notifications, acknowledged with `EVENT_RECEIVED`

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for the webhook handlers
#[derive(Clone)]
pub struct MessengerState {
    /// Expected verify token; `None` rejects every verification attempt
    pub verify_token: Option<Arc<str>>,
}

/// Create the messenger webhook router
pub fn messenger_router(state: MessengerState) -> Router {
    Router::new()
        .route("/webhook", get(verify).post(receive))
        .with_state(state)
}

/// Query parameters sent during subscription verification
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Kind of a single messaging event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Message,
    Postback,
    Unhandled,
}

/// Classify a messaging event by the fields it carries
pub fn classify_event(event: &serde_json::Value) -> EventKind {
    if event.get("message").is_some() {
        EventKind::Message
    } else if event.get("postback").is_some() {
        EventKind::Postback
    } else {
        EventKind::Unhandled
    }
}

/// GET /webhook
async fn verify(
    State(state): State<MessengerState>,
    Query(query): Query<VerifyQuery>,
) -> impl IntoResponse {
    let mode_ok = query.mode.as_deref().map(str::trim) == Some("subscribe");
    let token_ok = match (&state.verify_token, &query.verify_token) {
        (Some(expected), Some(given)) => expected.as_ref() == given,
        _ => false,
    };

    if mode_ok && token_ok {
        tracing::info!("Webhook verified successfully");
        (StatusCode::OK, query.challenge.unwrap_or_default())
    } else {
        tracing::error!("Webhook verification failed");
        (StatusCode::FORBIDDEN, "Forbidden".to_string())
    }
}

/// POST /webhook
async fn receive(body: Bytes) -> impl IntoResponse {
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(&body) else {
        return (StatusCode::NOT_FOUND, "Not Found");
    };
    if body.get("object").and_then(|o| o.as_str()) != Some("page") {
        return (StatusCode::NOT_FOUND, "Not Found");
    }

    let entries = body
        .get("entry")
        .and_then(|e| e.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();

    for entry in entries {
        let Some(event) = entry
            .get("messaging")
            .and_then(|m| m.as_array())
            .and_then(|m| m.first())
        else {
            continue;
        };

        match classify_event(event) {
            EventKind::Message => tracing::info!(event = %event["message"], "Received message"),
            EventKind::Postback => {
                tracing::info!(event = %event["postback"], "Received postback")
            }
            EventKind::Unhandled => tracing::warn!(%event, "Unhandled event type"),
        }
    }

    (StatusCode::OK, "EVENT_RECEIVED")
}
