//! In-memory block store.
//!
//! BTree-backed, same contract as the PostgreSQL adapter including both
//! uniqueness constraints and the gap semantics. Used by unit and
//! integration tests and for running the watcher without a database.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use blockwatch_types::{BlockNumber, ChainId, HeaderRecord, NewHeader};

use crate::error::StoreError;
use crate::gaps::missing_in_range;
use crate::ports::BlockStore;

#[derive(Default)]
struct Inner {
    next_id: i64,
    by_chain: BTreeMap<ChainId, BTreeMap<BlockNumber, HeaderRecord>>,
    hashes: HashSet<(ChainId, String)>,
}

/// Block store held entirely in process memory.
#[derive(Default)]
pub struct MemoryBlockStore {
    inner: Mutex<Inner>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows across all chains. Test convenience.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .by_chain
            .values()
            .map(|headers| headers.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn latest(&self, chain_id: ChainId) -> Result<Option<HeaderRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .by_chain
            .get(&chain_id)
            .and_then(|headers| headers.values().next_back())
            .cloned())
    }

    async fn by_number(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<Option<HeaderRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .by_chain
            .get(&chain_id)
            .and_then(|headers| headers.get(&number))
            .cloned())
    }

    async fn upsert_many(&self, headers: &[NewHeader]) -> Result<u64, StoreError> {
        if headers.is_empty() {
            return Ok(0);
        }

        let mut inner = self.inner.lock();
        let mut inserted = 0u64;
        for header in headers {
            let number_taken = inner
                .by_chain
                .get(&header.chain_id)
                .is_some_and(|existing| existing.contains_key(&header.number));
            let hash_taken = inner
                .hashes
                .contains(&(header.chain_id, header.hash.clone()));
            if number_taken || hash_taken {
                continue;
            }

            inner.next_id += 1;
            let record = HeaderRecord {
                id: inner.next_id,
                chain_id: header.chain_id,
                number: header.number,
                hash: header.hash.clone(),
                parent_hash: header.parent_hash.clone(),
                timestamp: header.timestamp,
            };
            inner.hashes.insert((header.chain_id, header.hash.clone()));
            inner
                .by_chain
                .entry(header.chain_id)
                .or_default()
                .insert(header.number, record);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn find_missing_in_range(
        &self,
        chain_id: ChainId,
        limit: usize,
    ) -> Result<Vec<BlockNumber>, StoreError> {
        let inner = self.inner.lock();
        let heights: Vec<BlockNumber> = inner
            .by_chain
            .get(&chain_id)
            .map(|headers| headers.keys().copied().collect())
            .unwrap_or_default();
        Ok(missing_in_range(&heights, limit))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(chain_id: ChainId, number: BlockNumber) -> NewHeader {
        NewHeader {
            chain_id,
            number,
            hash: format!("0xmock_{chain_id}_{number}"),
            parent_hash: format!("0xmock_{chain_id}_{}", number.wrapping_sub(1)),
            timestamp: 1_700_000_000 + number as u32,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_read_back() {
        let store = MemoryBlockStore::new();

        let inserted = store.upsert_many(&[header(1, 100)]).await.unwrap();
        assert_eq!(inserted, 1);

        let found = store.by_number(1, 100).await.unwrap().unwrap();
        assert_eq!(found.hash, "0xmock_1_100");
        assert_eq!(store.latest(1).await.unwrap().unwrap().number, 100);
    }

    #[tokio::test]
    async fn test_replayed_batch_inserts_zero() {
        let store = MemoryBlockStore::new();
        let batch = vec![header(1, 1), header(1, 2), header(1, 3)];

        assert_eq!(store.upsert_many(&batch).await.unwrap(), 3);
        assert_eq!(store.upsert_many(&batch).await.unwrap(), 0);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_overlapping_batches_union() {
        let store = MemoryBlockStore::new();

        store
            .upsert_many(&[header(1, 1), header(1, 2)])
            .await
            .unwrap();
        let second = store
            .upsert_many(&[header(1, 2), header(1, 3)])
            .await
            .unwrap();

        assert_eq!(second, 1);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_hash_skipped() {
        let store = MemoryBlockStore::new();

        let mut a = header(1, 10);
        let mut b = header(1, 11);
        a.hash = "0xsame".to_string();
        b.hash = "0xsame".to_string();

        assert_eq!(store.upsert_many(&[a, b]).await.unwrap(), 1);
        assert!(store.by_number(1, 11).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_cross_chain_bleed() {
        let store = MemoryBlockStore::new();

        store.upsert_many(&[header(1, 500)]).await.unwrap();
        store.upsert_many(&[header(2, 500)]).await.unwrap();

        assert_eq!(store.by_number(1, 500).await.unwrap().unwrap().hash, "0xmock_1_500");
        assert_eq!(store.by_number(2, 500).await.unwrap().unwrap().hash, "0xmock_2_500");
        assert!(store.by_number(3, 500).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_input_is_a_no_op() {
        let store = MemoryBlockStore::new();
        assert_eq!(store.upsert_many(&[]).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_in_range_bounded() {
        let store = MemoryBlockStore::new();
        let mut batch = Vec::new();
        for n in (3000..=3010).chain(3050..=3060).chain(3100..=3110) {
            batch.push(header(99, n));
        }
        store.upsert_many(&batch).await.unwrap();

        let missing = store.find_missing_in_range(99, 10).await.unwrap();
        assert_eq!(missing, (3011..=3020).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_missing_in_range_empty_chain() {
        let store = MemoryBlockStore::new();
        assert!(store.find_missing_in_range(1, 10).await.unwrap().is_empty());
    }
}
