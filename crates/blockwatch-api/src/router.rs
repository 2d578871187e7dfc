//! Router assembly.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use blockwatch_store::BlockStore;

use crate::handlers;
use crate::middleware::track_requests;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlockStore>,
    /// Liveness memory ceiling; `None` disables the check.
    pub max_rss_bytes: Option<u64>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlockStore>, max_rss_bytes: Option<u64>) -> Self {
        Self {
            store,
            max_rss_bytes,
        }
    }
}

/// All routes, with request metrics recorded around every response
/// (including 404s from unmatched paths).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/evm/blocks/health", get(handlers::blocks_health))
        .route("/evm/blocks/:chain_id/latest", get(handlers::latest_block))
        .route(
            "/evm/blocks/:chain_id/:number",
            get(handlers::block_by_number),
        )
        .route("/health/liveness", get(handlers::liveness))
        .route("/health/readiness", get(handlers::readiness))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
