//! # Ingestion Scheduler
//!
//! The control plane of the watcher: two periodic tasks drive all writes.
//! The *head tick* (short period) fetches and persists each configured
//! chain's current tip; the *gap scan* (long period) finds heights missing
//! inside the stored range and backfills a bounded batch of them.
//!
//! The scheduler keeps no persistent bookkeeping. Its cursor is
//! `BlockStore::latest`, and overlapping timers are harmless because the
//! store's batch insert is idempotent and the gap scan never proposes
//! heights outside the already-observed range.

pub mod config;
pub mod service;

pub use config::IngestConfig;
pub use service::IngestService;
