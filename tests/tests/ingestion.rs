//! End-to-end ingestion scenarios: head ticks and gap scans against the
//! in-memory store and a scripted gateway.

use std::sync::Arc;

use blockwatch_ingest::{IngestConfig, IngestService};
use blockwatch_rpc::{RpcError, ScriptedRpc};
use blockwatch_store::{BlockStore, MemoryBlockStore};
use blockwatch_telemetry::metrics::HEAD_TICK_ERRORS;
use blockwatch_tests::{header, seeded_store};
use blockwatch_types::NewHeader;

fn service<R: blockwatch_rpc::RpcGateway + 'static>(
    rpc: R,
    store: Arc<MemoryBlockStore>,
) -> IngestService<R, MemoryBlockStore> {
    IngestService::new(IngestConfig::for_testing(), Arc::new(rpc), store)
}

#[tokio::test]
async fn gap_scan_skips_chain_with_no_blocks() {
    let store = Arc::new(MemoryBlockStore::new());
    let rpc = ScriptedRpc::new(vec![1]).with_mock_blocks(1, 1..=100);
    let service = service(rpc, Arc::clone(&store));

    service.run_gap_scan().await;

    // The scan never introduces a chain's first block.
    assert!(store.is_empty());
}

#[tokio::test]
async fn head_tick_seeds_a_chain() {
    let store = Arc::new(MemoryBlockStore::new());
    let rpc = ScriptedRpc::new(vec![3]).with_head(3, 5000).with_block(NewHeader {
        chain_id: 3,
        number: 5000,
        hash: "0xhead5000".to_string(),
        parent_hash: "0xparent5000".to_string(),
        timestamp: 1_700_000_000,
    });
    let service = service(rpc, Arc::clone(&store));

    service.run_head_tick().await;

    assert_eq!(store.len(), 1);
    let latest = store.latest(3).await.unwrap().unwrap();
    assert_eq!(latest.number, 5000);
    assert_eq!(latest.timestamp, 1_700_000_000);
    assert_eq!(
        store.by_number(3, 5000).await.unwrap().unwrap().hash,
        "0xhead5000"
    );
}

#[tokio::test]
async fn gap_scan_fills_interior_range() {
    let store = seeded_store(2, (2000..=2005).chain(2010..=2015)).await;
    let rpc = ScriptedRpc::new(vec![2]).with_mock_blocks(2, 2006..=2009);
    let service = service(rpc, Arc::clone(&store));

    service.run_gap_scan().await;

    assert_eq!(
        store.by_number(2, 2006).await.unwrap().unwrap().hash,
        "0xmock_2006"
    );
    assert_eq!(
        store.by_number(2, 2009).await.unwrap().unwrap().hash,
        "0xmock_2009"
    );
    assert_eq!(store.len(), 16);

    // Identical second invocation inserts nothing new.
    service.run_gap_scan().await;
    assert_eq!(store.len(), 16);
}

#[tokio::test]
async fn contiguous_chain_reports_no_gaps() {
    let store = seeded_store(1, 1000..=1020).await;
    let rpc = ScriptedRpc::new(vec![1]).with_mock_blocks(1, 1..=2000);
    let service = service(rpc, Arc::clone(&store));

    let before = store.len();
    service.run_gap_scan().await;

    assert_eq!(store.len(), before);
    assert!(store.find_missing_in_range(1, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn rpc_failure_on_one_chain_does_not_touch_the_others() {
    let errors_chain_1 = HEAD_TICK_ERRORS.with_label_values(&["1"]).get();
    let errors_chain_2 = HEAD_TICK_ERRORS.with_label_values(&["2"]).get();
    let errors_chain_3 = HEAD_TICK_ERRORS.with_label_values(&["3"]).get();

    let store = Arc::new(MemoryBlockStore::new());
    let rpc = ScriptedRpc::new(vec![1, 2, 3])
        .with_head(1, 100)
        .with_mock_blocks(1, [100])
        .with_head_error(2, RpcError::Unavailable("node down".to_string()))
        .with_head(3, 300)
        .with_mock_blocks(3, [300]);
    let service = service(rpc, Arc::clone(&store));

    service.run_head_tick().await;

    assert!(store.by_number(1, 100).await.unwrap().is_some());
    assert!(store.by_number(3, 300).await.unwrap().is_some());
    assert!(store.latest(2).await.unwrap().is_none());

    assert_eq!(
        HEAD_TICK_ERRORS.with_label_values(&["2"]).get() - errors_chain_2,
        1
    );
    assert_eq!(
        HEAD_TICK_ERRORS.with_label_values(&["1"]).get() - errors_chain_1,
        0
    );
    assert_eq!(
        HEAD_TICK_ERRORS.with_label_values(&["3"]).get() - errors_chain_3,
        0
    );
}

#[tokio::test]
async fn gap_output_is_bounded_and_smallest_first() {
    let store = seeded_store(99, (3000..=3010).chain(3050..=3060).chain(3100..=3110)).await;

    let missing = store.find_missing_in_range(99, 10).await.unwrap();

    assert_eq!(missing, (3011..=3020).collect::<Vec<u64>>());
}

#[tokio::test]
async fn replayed_batch_inserts_zero_rows() {
    let store = Arc::new(MemoryBlockStore::new());
    let batch: Vec<NewHeader> = (1..=5).map(|n| header(42, n)).collect();

    assert_eq!(store.upsert_many(&batch).await.unwrap(), 5);
    assert_eq!(store.upsert_many(&batch).await.unwrap(), 0);
    assert_eq!(store.len(), 5);
}
