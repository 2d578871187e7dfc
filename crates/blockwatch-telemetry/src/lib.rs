//! # Telemetry Crate
//!
//! Prometheus metrics and logging bootstrap for all watcher subsystems.
//!
//! Every subsystem records into the metric statics defined in [`metrics`];
//! the block store is the one exception, reporting through the narrow
//! [`observer::PrometheusStoreObserver`] capability so the store crate does
//! not import this one.

pub mod logging;
pub mod metrics;
pub mod observer;
pub mod routes;

pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics};
pub use observer::PrometheusStoreObserver;
pub use routes::{normalize_route, route_label};

use thiserror::Error;

/// Telemetry bootstrap failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("metrics init failed: {0}")]
    MetricsInit(String),

    #[error("logging init failed: {0}")]
    LoggingInit(String),
}
