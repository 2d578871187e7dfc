//! Read-API scenarios exercised through the router, no socket involved.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use blockwatch_api::{build_router, AppState};
use blockwatch_store::{BlockStore, MemoryBlockStore};
use blockwatch_tests::seeded_store;
use blockwatch_types::NewHeader;

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn app_with(store: Arc<MemoryBlockStore>) -> Router {
    build_router(AppState::new(store as Arc<dyn BlockStore>, None))
}

#[tokio::test]
async fn blocks_health_shape() {
    let app = app_with(Arc::new(MemoryBlockStore::new()));
    let (status, body) = get_json(&app, "/evm/blocks/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn latest_returns_exact_dto_shape() {
    let store = Arc::new(MemoryBlockStore::new());
    store
        .upsert_many(&[NewHeader {
            chain_id: 1,
            number: 19_000_000,
            hash: "0xheadhash".to_string(),
            parent_hash: "0xparenthash".to_string(),
            timestamp: 1_700_000_000,
        }])
        .await
        .unwrap();
    let app = app_with(store);

    let (status, body) = get_json(&app, "/evm/blocks/1/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], "19000000");
    assert_eq!(body["hash"], "0xheadhash");
    assert_eq!(body["parentHash"], "0xparenthash");
    assert_eq!(body["timestamp"], "1700000000");

    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["hash", "number", "parentHash", "timestamp"]);
}

#[tokio::test]
async fn by_number_accepts_heights_beyond_32_bits() {
    let store = seeded_store(7, [5_000_000_000]).await;
    let app = app_with(store);

    let (status, body) = get_json(&app, "/evm/blocks/7/5000000000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], "5000000000");
}

#[tokio::test]
async fn missing_records_answer_soft_not_found() {
    let app = app_with(Arc::new(MemoryBlockStore::new()));

    let (status, body) = get_json(&app, "/evm/blocks/1/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));

    let (status, body) = get_json(&app, "/evm/blocks/1/12345").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));
}

#[tokio::test]
async fn malformed_path_parameters_answer_400() {
    let app = app_with(Arc::new(MemoryBlockStore::new()));

    let (status, _) = get(&app, "/evm/blocks/abc/latest").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/evm/blocks/1/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/evm/blocks/1/-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_probes_answer_200_when_healthy() {
    let app = app_with(Arc::new(MemoryBlockStore::new()));

    let (status, body) = get_json(&app, "/health/liveness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = get_json(&app, "/health/readiness").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unmatched_paths_answer_404() {
    let app = app_with(Arc::new(MemoryBlockStore::new()));
    let (status, _) = get(&app, "/evm/transactions/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let _ = blockwatch_telemetry::register_metrics();
    let store = seeded_store(5, [10]).await;
    let app = app_with(store);

    // Drive one normalized observation through the middleware first.
    let (status, _) = get(&app, "/evm/blocks/5/latest").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_server_requests_seconds"));
    // The chain id was normalized out of the route label.
    assert!(text.contains("/evm/blocks/:id/latest"));
    assert!(!text.contains("/evm/blocks/5/latest"));
}
