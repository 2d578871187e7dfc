//! Block header records.
//!
//! Two shapes exist: `NewHeader` is what the RPC gateway produces and the
//! store ingests; `HeaderRecord` is the persisted row with its surrogate id.
//! Headers are immutable once written; there is no update shape.

use serde::{Deserialize, Serialize};

use crate::chains::ChainId;

/// Block height within a chain.
pub type BlockNumber = u64;

/// Block timestamp, seconds since epoch as produced by the chain.
pub type UnixTimestamp = u32;

/// A header as fetched from a chain, ready for insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHeader {
    pub chain_id: ChainId,
    pub number: BlockNumber,
    /// 0x-prefixed hex block hash.
    pub hash: String,
    /// 0x-prefixed hex parent hash. Not verified against the prior row.
    pub parent_hash: String,
    pub timestamp: UnixTimestamp,
}

/// A persisted header row.
///
/// The surrogate `id` never leaves the process; the read API serializes only
/// the header fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub id: i64,
    pub chain_id: ChainId,
    pub number: BlockNumber,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: UnixTimestamp,
}

impl HeaderRecord {
    /// The insertable view of this row.
    pub fn as_new(&self) -> NewHeader {
        NewHeader {
            chain_id: self.chain_id,
            number: self.number,
            hash: self.hash.clone(),
            parent_hash: self.parent_hash.clone(),
            timestamp: self.timestamp,
        }
    }
}
