//! Degraded-mode behavior
//!
//! The gateway must come up and keep serving when no store is configured
//! or the configured store stops answering: reads degrade to empty
//! results, writes fail loudly, and diagnostics report the state.

use std::sync::Arc;

use async_trait::async_trait;
use aufbau::config::Config;
use aufbau::http::{router, AppState};
use aufbau::store::{DocumentStore, RawDocument, StoreError, StoreResult};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

/// Store double whose every operation fails as unreachable
struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, _collection: &str, _fields: Map<String, Value>) -> StoreResult<String> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn find(&self, _collection: &str, _limit: usize) -> StoreResult<Vec<RawDocument>> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

fn storeless_app() -> Router {
    router(AppState::new(None, &Config::default()))
}

fn failing_app() -> Router {
    let config = Config {
        database_url: Some("rocksdb:///var/lib/aufbau".to_string()),
        database_name: Some("ea_inventory".to_string()),
        port: 0,
    };
    router(AppState::new(Some(Arc::new(FailingStore) as Arc<dyn DocumentStore>), &config))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_storeless_list_degrades_to_empty() {
    let app = storeless_app();
    let (status, body) = get(&app, "/documents/application").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": []}));
}

#[tokio::test]
async fn test_storeless_create_fails_loudly() {
    let app = storeless_app();
    let (status, body) =
        post(&app, "/documents/risk", json!({"data": {"title": "Unstored"}})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("no document store configured"));
}

#[tokio::test]
async fn test_storeless_graph_is_empty() {
    let app = storeless_app();
    let (status, body) = get(&app, "/graph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"nodes": [], "edges": []}));
}

#[tokio::test]
async fn test_storeless_diagnostics() {
    let app = storeless_app();
    let (status, body) = get(&app, "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], json!("running"));
    assert_eq!(body["database"], json!("not configured"));
    assert_eq!(body["database_url"], json!("not set"));
    assert_eq!(body["database_name"], json!("not set"));
    assert_eq!(body["connection_status"], json!("not connected"));
    assert_eq!(body["collections"], json!([]));
}

#[tokio::test]
async fn test_storeless_unknown_collection_still_404() {
    let app = storeless_app();
    let (status, _body) = get(&app, "/documents/widget").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failing_store_list_degrades_to_empty() {
    let app = failing_app();
    let (status, body) = get(&app, "/documents/risk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": []}));
}

#[tokio::test]
async fn test_failing_store_create_returns_503() {
    let app = failing_app();
    let (status, body) =
        post(&app, "/documents/risk", json!({"data": {"title": "Unstored"}})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("store offline"));
}

#[tokio::test]
async fn test_failing_store_graph_is_empty() {
    let app = failing_app();
    let (status, body) = get(&app, "/graph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"nodes": [], "edges": []}));
}

#[tokio::test]
async fn test_failing_store_diagnostics() {
    let app = failing_app();
    let (status, body) = get(&app, "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database_url"], json!("set"));
    assert_eq!(body["database_name"], json!("set"));
    assert_eq!(body["connection_status"], json!("not connected"));
    assert!(body["database"].as_str().unwrap().starts_with("unavailable:"));
    assert_eq!(body["collections"], json!([]));
}

#[tokio::test]
async fn test_validation_still_runs_before_store() {
    // a validation failure must win over the unreachable store
    let app = failing_app();
    let (status, body) = post(&app, "/documents/risk", json!({"data": {}})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("missing required field 'title'"));
}
