//! Logging bootstrap.
//!
//! Structured logs via `tracing-subscriber`; level from `RUST_LOG` (default
//! `info`), JSON formatting when `LOG_FORMAT=json` so a shipping agent can
//! parse fields without a pattern.

use tracing_subscriber::EnvFilter;

use crate::TelemetryError;

/// Install the global subscriber. Call once, before any other subsystem
/// starts logging.
pub fn init_logging() -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
