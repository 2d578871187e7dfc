//! # Read API
//!
//! Thin HTTP surface over the block store: latest and by-number header
//! queries, liveness/readiness probes, and the Prometheus scrape endpoint.
//! The API never writes; headers enter the store exclusively through the
//! ingestion scheduler.

pub mod dto;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod router;

pub use dto::HeaderDto;
pub use router::{build_router, AppState};
