//! Store observer backed by the Prometheus registry.
//!
//! The store crate defines the narrow `StoreObserver` capability and this
//! crate implements it, which keeps the dependency arrow pointing one way:
//! store → (trait) ← telemetry.

use blockwatch_store::StoreObserver;

use crate::metrics::{DB_CONNECTIONS_ACTIVE, DB_CONNECTIONS_IDLE, DB_QUERY_SECONDS};

/// Records store query timings and pool occupancy into the registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrometheusStoreObserver;

impl StoreObserver for PrometheusStoreObserver {
    fn record_query(&self, model: &str, action: &str, success: bool, seconds: f64) {
        let success = if success { "true" } else { "false" };
        DB_QUERY_SECONDS
            .with_label_values(&[model, action, success])
            .observe(seconds);
    }

    fn record_pool(&self, active: u64, idle: u64) {
        DB_CONNECTIONS_ACTIVE.set(active as i64);
        DB_CONNECTIONS_IDLE.set(idle as i64);
    }
}
