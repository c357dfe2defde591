//! Shared HTTP plumbing for the TagRelay services
//!
//! Every service router is wrapped the same way before it is served:
//!
//! | Layer / route | Description                        |
//! |---------------|------------------------------------|
//! | `/health`     | Liveness probe with crate version  |
//! | CORS          | Any origin unless origins are set  |
//! | Trace         | `tower_http` request/response spans |

use crate::error::Result;
use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Wrap a service router with the health probe, CORS and request tracing
pub fn build_app(service: Router, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(service)
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port` and serve `app` until Ctrl+C
pub async fn serve(app: Router, host: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down...");
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin: {}", e);
                    None
                }
            })
            .collect();
        cors.allow_origin(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let resp = health_check().await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_build_app_serves_health() {
        let app = build_app(Router::new(), &[]);
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = build_app(Router::new(), &[]);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:3001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    async fn allowed_origin(app: Router, origin: &str) -> Option<HeaderValue> {
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_cors_with_configured_origins() {
        let app = build_app(
            Router::new(),
            &[
                "http://a.example".to_string(),
                "https://dashboard.example.com".to_string(),
            ],
        );

        assert_eq!(
            allowed_origin(app.clone(), "http://a.example").await.unwrap(),
            "http://a.example"
        );
        assert_eq!(
            allowed_origin(app.clone(), "https://dashboard.example.com")
                .await
                .unwrap(),
            "https://dashboard.example.com"
        );
        assert!(allowed_origin(app, "http://evil.example").await.is_none());
    }

    #[tokio::test]
    async fn test_cors_skips_invalid_origin() {
        let app = build_app(
            Router::new(),
            &["bad\norigin".to_string(), "http://a.example".to_string()],
        );

        assert_eq!(
            allowed_origin(app.clone(), "http://a.example").await.unwrap(),
            "http://a.example"
        );
        assert!(allowed_origin(app, "http://b.example").await.is_none());
    }
}
