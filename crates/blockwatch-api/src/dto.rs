//! Response shapes.
//!
//! 64-bit numerics cross the boundary as decimal strings: consumers assume
//! no precision loss, and a JSON number cannot promise that.

use serde::{Deserialize, Serialize};

use blockwatch_types::HeaderRecord;

/// The block header DTO served by the read routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDto {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: String,
}

impl From<&HeaderRecord> for HeaderDto {
    fn from(record: &HeaderRecord) -> Self {
        Self {
            number: record.number.to_string(),
            hash: record.hash.clone(),
            parent_hash: record.parent_hash.clone(),
            timestamp: record.timestamp.to_string(),
        }
    }
}
