//! Prometheus metrics for the watcher subsystems.
//!
//! ## Metric Types
//!
//! - **Counter**: monotonically increasing value (e.g., head_tick_errors_total)
//! - **Gauge**: value that can go up or down (e.g., db_connections_active)
//! - **Histogram**: distribution of values (e.g., http_server_requests_seconds)
//!
//! Label domains that are not statically bounded are capped before
//! observation: route labels pass through the allow-list in [`crate::routes`],
//! and chain_id labels only ever carry configured chain ids.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // HTTP SERVER METRICS
    // =========================================================================

    /// Request duration by method, normalized route, and status code
    pub static ref HTTP_REQUEST_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_server_requests_seconds",
            "HTTP server request duration"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "route", "status_code"]
    ).expect("metric creation failed");

    // =========================================================================
    // BLOCK STORE METRICS
    // =========================================================================

    /// Store query duration by model, action, and outcome
    pub static ref DB_QUERY_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "db_query_seconds",
            "Database query duration"
        ).buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["model", "action", "success"]
    ).expect("metric creation failed");

    /// Connections currently checked out of the pool
    pub static ref DB_CONNECTIONS_ACTIVE: IntGauge = IntGauge::new(
        "db_connections_active",
        "Database connections currently in use"
    ).expect("metric creation failed");

    /// Connections sitting idle in the pool
    pub static ref DB_CONNECTIONS_IDLE: IntGauge = IntGauge::new(
        "db_connections_idle",
        "Database connections currently idle"
    ).expect("metric creation failed");

    // =========================================================================
    // INGESTION SCHEDULER METRICS
    // =========================================================================

    /// Head-tick failures per chain
    pub static ref HEAD_TICK_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("head_tick_errors_total", "Failed head ticks"),
        &["chain_id"]
    ).expect("metric creation failed");

    /// Gap-scan failures per chain
    pub static ref GAP_SCAN_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("gap_scan_errors_total", "Failed gap scans"),
        &["chain_id"]
    ).expect("metric creation failed");

    /// Last head height observed per chain
    pub static ref CHAIN_HEAD: IntGaugeVec = IntGaugeVec::new(
        Opts::new("chain_head_block_number", "Last observed head block number"),
        &["chain_id"]
    ).expect("metric creation failed");

    /// Lag between a timer's scheduled fire and its actual dispatch
    pub static ref SCHEDULER_LAG_SECONDS: Gauge = Gauge::new(
        "scheduler_lag_seconds",
        "Observed lag between scheduled and actual tick dispatch"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_SECONDS.clone()),
        // Store
        Box::new(DB_QUERY_SECONDS.clone()),
        Box::new(DB_CONNECTIONS_ACTIVE.clone()),
        Box::new(DB_CONNECTIONS_IDLE.clone()),
        // Scheduler
        Box::new(HEAD_TICK_ERRORS.clone()),
        Box::new(GAP_SCAN_ERRORS.clone()),
        Box::new(CHAIN_HEAD.clone()),
        Box::new(SCHEDULER_LAG_SECONDS.clone()),
    ];

    for metric in metrics {
        register_once(metric)?;
    }

    #[cfg(target_os = "linux")]
    register_once(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;

    Ok(())
}

/// Registration is idempotent: a collector that is already in the registry
/// is left alone.
fn register_once(metric: Box<dyn prometheus::core::Collector>) -> Result<(), TelemetryError> {
    match REGISTRY.register(metric) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(TelemetryError::MetricsInit(e.to_string())),
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
