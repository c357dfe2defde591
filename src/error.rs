//! TagRelay error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// TagRelay error type
#[derive(Error, Debug)]
pub enum Error {
    /// Request body failed the presence checks
    #[error("{0}")]
    InvalidPayload(String),

    /// A downstream service could not be reached or answered with a failure status
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// A downstream service answered but the body violates its contract
    #[error("{0}")]
    UpstreamMalformed(String),

    /// The model call failed or produced unusable output
    #[error("{0}")]
    GenerationFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// HTTP status reported to the caller for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for TagRelay operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidPayload("Invalid payload".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::UpstreamUnavailable("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::UpstreamMalformed("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::GenerationFailed("nope".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let resp = Error::InvalidPayload("Message is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Message is required"}));
    }
}
