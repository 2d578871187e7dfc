//! # Store Ports
//!
//! The `BlockStore` contract consumed by the scheduler and the read API,
//! and the narrow `StoreObserver` capability the store emits telemetry
//! through. The observer is injected at construction so the store never
//! imports the metrics surface.

use async_trait::async_trait;

use blockwatch_types::{BlockNumber, ChainId, HeaderRecord, NewHeader};

use crate::error::StoreError;

/// Chain-scoped header repository.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Header with the maximum stored height for the chain, if any.
    async fn latest(&self, chain_id: ChainId) -> Result<Option<HeaderRecord>, StoreError>;

    /// Header at an exact height, if stored.
    async fn by_number(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<Option<HeaderRecord>, StoreError>;

    /// Insert a batch, silently skipping rows that collide on either
    /// `(chain_id, number)` or `(chain_id, hash)`.
    ///
    /// Returns the count of rows actually inserted. The batch is atomic:
    /// all non-duplicate rows commit or none do. Empty input performs no
    /// I/O and returns zero.
    async fn upsert_many(&self, headers: &[NewHeader]) -> Result<u64, StoreError>;

    /// Heights missing strictly inside the chain's stored `[first, last]`
    /// range, ascending, at most `limit` of them.
    ///
    /// Never proposes heights at or beyond the stored frontier; advancing
    /// the tip is the head tick's job.
    async fn find_missing_in_range(
        &self,
        chain_id: ChainId,
        limit: usize,
    ) -> Result<Vec<BlockNumber>, StoreError>;

    /// Cheap reachability probe for the readiness check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Telemetry capability handed to the store at construction.
pub trait StoreObserver: Send + Sync {
    /// One query finished: duration in seconds, by model/action/outcome.
    fn record_query(&self, model: &str, action: &str, success: bool, seconds: f64);

    /// Current connection-pool occupancy.
    fn record_pool(&self, active: u64, idle: u64);
}

/// Observer that discards everything, for tests and wiring without a
/// metrics surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {
    fn record_query(&self, _model: &str, _action: &str, _success: bool, _seconds: f64) {}

    fn record_pool(&self, _active: u64, _idle: u64) {}
}
