//! Route handlers.
//!
//! Missing records on the block routes answer `200 {"error":"Not found"}`,
//! a deliberate sentinel kept for compatibility with the service this
//! replaces. Infrastructure failures answer 5xx; the two are never
//! conflated.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use blockwatch_types::{BlockNumber, ChainId, HeaderRecord};

use crate::dto::HeaderDto;
use crate::health::memory_ok;
use crate::router::AppState;

pub async fn blocks_health() -> Response {
    (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
}

pub async fn latest_block(
    State(state): State<AppState>,
    Path(chain_id): Path<String>,
) -> Response {
    let Ok(chain_id) = chain_id.parse::<ChainId>() else {
        return bad_request();
    };

    match state.store.latest(chain_id).await {
        Ok(record) => found_or_sentinel(record),
        Err(err) => {
            error!(chain_id, error = %err, "latest query failed");
            internal_error()
        }
    }
}

pub async fn block_by_number(
    State(state): State<AppState>,
    Path((chain_id, number)): Path<(String, String)>,
) -> Response {
    let Ok(chain_id) = chain_id.parse::<ChainId>() else {
        return bad_request();
    };
    let Ok(number) = number.parse::<BlockNumber>() else {
        return bad_request();
    };

    match state.store.by_number(chain_id, number).await {
        Ok(record) => found_or_sentinel(record),
        Err(err) => {
            error!(chain_id, number, error = %err, "by-number query failed");
            internal_error()
        }
    }
}

pub async fn liveness(State(state): State<AppState>) -> Response {
    if memory_ok(state.max_rss_bytes) {
        (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error" })),
        )
            .into_response()
    }
}

pub async fn readiness(State(state): State<AppState>) -> Response {
    if !memory_ok(state.max_rss_bytes) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error" })),
        )
            .into_response();
    }

    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(err) => {
            error!(error = %err, "readiness store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}

pub async fn metrics() -> Response {
    match blockwatch_telemetry::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "metrics encoding failed");
            internal_error()
        }
    }
}

fn found_or_sentinel(record: Option<HeaderRecord>) -> Response {
    match record {
        Some(record) => (StatusCode::OK, Json(HeaderDto::from(&record))).into_response(),
        None => (StatusCode::OK, Json(json!({ "error": "Not found" }))).into_response(),
    }
}

fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid path parameter" })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
