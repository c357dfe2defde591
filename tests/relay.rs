//! End-to-end relay: intake → enrichment → stubbed model

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tagrelay::api::build_app;
use tagrelay::enrichment::{enrichment_router, CompletionBackend, EnrichmentState, Prompt};
use tagrelay::intake::{intake_router, EnrichmentClient, IntakeState, RecordStore};
use tower::ServiceExt;

struct ScriptedModel(&'static str);

#[async_trait]
impl CompletionBackend for ScriptedModel {
    async fn complete(&self, _prompt: &Prompt) -> tagrelay::Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

async fn spawn_enrichment(model_output: &'static str) -> String {
    let app = build_app(
        enrichment_router(EnrichmentState {
            backend: Arc::new(ScriptedModel(model_output)),
        }),
        &[],
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn intake_app(enrichment_url: String) -> (Router, RecordStore) {
    let store = RecordStore::new();
    let state = IntakeState {
        store: store.clone(),
        enrichment: EnrichmentClient::new(enrichment_url, None).unwrap(),
    };
    (build_app(intake_router(state), &[]), store)
}

fn submit(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/new")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn list(app: &Router) -> serde_json::Value {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/get").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 1024 * 64)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_submission_is_enriched_and_stored() {
    let url = spawn_enrichment("Tags: Foo, 'Bar'\nSummary: hello").await;
    let (app, store) = intake_app(url);

    assert_eq!(list(&app).await, serde_json::json!([]));

    let resp = app
        .clone()
        .oneshot(submit(
            r#"{"message":"please look at this","userid":"u-42","platform":"telegram"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(store.len().await, 1);
    assert_eq!(
        list(&app).await,
        serde_json::json!([{
            "userid": "u-42",
            "platform": "telegram",
            "tags": ["Foo", "Bar", "low_urgency"],
            "summary": "hello"
        }])
    );
}

#[tokio::test]
async fn test_model_without_summary_stores_nothing() {
    let url = spawn_enrichment("Tags: outage, urgent").await;
    let (app, store) = intake_app(url);

    let resp = app
        .clone()
        .oneshot(submit(r#"{"message":"site down","userid":"u-1","platform":"web"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.is_empty().await);
    assert_eq!(list(&app).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_concurrent_submissions_all_stored() {
    let url = spawn_enrichment("Tags: question\nSummary: A question.").await;
    let (app, store) = intake_app(url);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = format!(r#"{{"message":"q{i}","userid":"u-{i}","platform":"web"}}"#);
                app.oneshot(submit(&body)).await.unwrap().status()
            })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(store.len().await, 16);
}
