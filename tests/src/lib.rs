//! Shared helpers for the end-to-end suite.

use std::sync::Arc;

use blockwatch_rpc::mock::mock_header;
use blockwatch_store::{BlockStore, MemoryBlockStore};
use blockwatch_types::{BlockNumber, ChainId, NewHeader};

/// A fully populated header with the conventional mock hash.
pub fn header(chain_id: ChainId, number: BlockNumber) -> NewHeader {
    mock_header(chain_id, number)
}

/// An in-memory store pre-seeded with the given heights for one chain.
pub async fn seeded_store(
    chain_id: ChainId,
    heights: impl IntoIterator<Item = BlockNumber>,
) -> Arc<MemoryBlockStore> {
    let store = Arc::new(MemoryBlockStore::new());
    let batch: Vec<NewHeader> = heights.into_iter().map(|n| header(chain_id, n)).collect();
    store
        .upsert_many(&batch)
        .await
        .expect("in-memory seed cannot fail");
    store
}
