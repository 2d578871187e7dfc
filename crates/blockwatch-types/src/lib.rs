//! # Shared Types Crate
//!
//! Cross-subsystem domain types for the watcher: chain identifiers, block
//! heights, and the header records that flow between the RPC gateway, the
//! block store, and the read API.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every crate speaks in these types; nothing
//!   is redefined downstream.
//! - **Wide integers end-to-end**: heights are `u64` and never pass through
//!   a lossy representation until they are rendered as decimal strings at
//!   the HTTP boundary.

pub mod chains;
pub mod header;

pub use chains::{well_known_chain_name, ChainId};
pub use header::{BlockNumber, HeaderRecord, NewHeader, UnixTimestamp};
