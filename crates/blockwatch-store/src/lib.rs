//! # Block Store
//!
//! Durable, chain-scoped header repository. The store is the single
//! authority on what has been ingested: the scheduler's cursor is
//! `latest(chain_id)`, and interior holes are discovered here, never by the
//! scheduler walking the chain itself.
//!
//! The public contract lives in [`ports::BlockStore`]; production uses the
//! PostgreSQL adapter, tests and database-less local runs use the in-memory
//! adapter. Both enforce the same pair of uniqueness constraints and both
//! answer gap queries with the semantics of [`gaps::missing_in_range`].

pub mod adapters;
pub mod error;
pub mod gaps;
pub mod ports;

pub use adapters::memory::MemoryBlockStore;
pub use adapters::postgres::{PgBlockStore, MIGRATOR};
pub use error::StoreError;
pub use ports::{BlockStore, NoopObserver, StoreObserver};
