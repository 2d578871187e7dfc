//! # Ingestion Service
//!
//! Drives the head tick and gap scan for every configured chain. Chains are
//! isolated: one chain's failure is logged and counted, and the loop moves
//! on to the next chain. Nothing is retried inside a tick; the next firing
//! of the same timer is the retry.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use blockwatch_rpc::{RpcError, RpcGateway};
use blockwatch_store::{BlockStore, StoreError};
use blockwatch_telemetry::metrics::{
    CHAIN_HEAD, GAP_SCAN_ERRORS, HEAD_TICK_ERRORS, SCHEDULER_LAG_SECONDS,
};
use blockwatch_types::{BlockNumber, ChainId, NewHeader};

use crate::config::IngestConfig;

/// One chain's work unit failed; the caller logs and counts it.
#[derive(Debug, Error)]
enum TickError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TickError {
    fn is_configuration(&self) -> bool {
        matches!(self, TickError::Rpc(RpcError::ChainUnknown(_)))
    }
}

/// The per-chain polling and gap-repair scheduler.
pub struct IngestService<R, S> {
    config: IngestConfig,
    rpc: Arc<R>,
    store: Arc<S>,
    chains: Vec<ChainId>,
}

impl<R, S> IngestService<R, S>
where
    R: RpcGateway + 'static,
    S: BlockStore + 'static,
{
    /// The chain set is taken from the gateway once; it does not change at
    /// runtime.
    pub fn new(config: IngestConfig, rpc: Arc<R>, store: Arc<S>) -> Self {
        let chains = rpc.configured_chain_ids();
        Self {
            config,
            rpc,
            store,
            chains,
        }
    }

    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    /// Run both timers until the shutdown signal flips. In-flight work is
    /// awaited before the loop exits; no new work is dispatched after the
    /// signal.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(chains = ?self.chains, "ingestion scheduler starting");

        // Catch up on interior gaps immediately; the head tick's first
        // firing is governed by its timer.
        self.run_gap_scan().await;

        let mut head_timer = interval_at(
            Instant::now() + self.config.head_interval,
            self.config.head_interval,
        );
        head_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut gap_timer = interval_at(
            Instant::now() + self.config.gap_interval,
            self.config.gap_interval,
        );
        gap_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("ingestion scheduler stopping");
                    break;
                }
                scheduled = head_timer.tick() => {
                    observe_lag(scheduled);
                    self.run_head_tick().await;
                }
                scheduled = gap_timer.tick() => {
                    observe_lag(scheduled);
                    self.run_gap_scan().await;
                }
            }
        }
    }

    /// One head tick over all configured chains.
    pub async fn run_head_tick(&self) {
        for &chain_id in &self.chains {
            if let Err(err) = self.head_tick_chain(chain_id).await {
                if err.is_configuration() {
                    error!(chain_id, error = %err, "head tick failed: chain not configured");
                } else {
                    warn!(chain_id, error = %err, "head tick failed");
                }
                HEAD_TICK_ERRORS
                    .with_label_values(&[&chain_id.to_string()])
                    .inc();
            }
        }
    }

    /// One gap scan over all configured chains.
    pub async fn run_gap_scan(&self) {
        for &chain_id in &self.chains {
            if let Err(err) = self.gap_scan_chain(chain_id).await {
                if err.is_configuration() {
                    error!(chain_id, error = %err, "gap scan failed: chain not configured");
                } else {
                    warn!(chain_id, error = %err, "gap scan failed");
                }
                GAP_SCAN_ERRORS
                    .with_label_values(&[&chain_id.to_string()])
                    .inc();
            }
        }
    }

    /// `head_number → block_by_number → upsert_many`, strictly in that
    /// order, each RPC call under the head deadline.
    async fn head_tick_chain(&self, chain_id: ChainId) -> Result<(), TickError> {
        let deadline = self.config.head_deadline();

        let head = with_deadline(deadline, self.rpc.head_number(chain_id)).await?;
        let header = match with_deadline(deadline, self.rpc.block_by_number(chain_id, head)).await
        {
            // The node reported this height as its tip a moment ago; not
            // serving it yet is transient inconsistency, not a missing block.
            Err(RpcError::NotFound) => Err(RpcError::Unavailable(format!(
                "head {head} not served by node"
            ))),
            other => other,
        }?;

        let inserted = self
            .store
            .upsert_many(std::slice::from_ref(&header))
            .await?;

        CHAIN_HEAD
            .with_label_values(&[&chain_id.to_string()])
            .set(head as i64);
        debug!(
            chain_id,
            chain = %self.rpc.chain_name(chain_id),
            height = head,
            inserted,
            "head synced"
        );
        Ok(())
    }

    /// Backfill at most `gap_limit` interior heights for one chain.
    ///
    /// Partial successes are kept: every header that came back whole is
    /// upserted even when sibling fetches failed, and the scan then reports
    /// the first failure for the chain.
    async fn gap_scan_chain(&self, chain_id: ChainId) -> Result<(), TickError> {
        if self.store.latest(chain_id).await?.is_none() {
            debug!(chain_id, "No blocks in DB yet");
            return Ok(());
        }

        let missing = self
            .store
            .find_missing_in_range(chain_id, self.config.gap_limit)
            .await?;
        if missing.is_empty() {
            debug!(chain_id, "No missing blocks found");
            return Ok(());
        }

        debug!(chain_id, heights = ?missing, "filling gaps");
        let deadline = self.config.gap_deadline();
        let fetches = missing.iter().map(|&number| {
            let rpc = Arc::clone(&self.rpc);
            async move {
                let result = with_deadline(deadline, rpc.block_by_number(chain_id, number)).await;
                (number, result)
            }
        });

        let mut headers: Vec<NewHeader> = Vec::with_capacity(missing.len());
        let mut first_failure: Option<RpcError> = None;
        for (number, result) in join_all(fetches).await {
            match result {
                Ok(header) => headers.push(header),
                Err(RpcError::NotFound) => {
                    // The height came from stored neighbors; a node that
                    // cannot serve it deserves attention, but the scan
                    // moves on.
                    error!(
                        chain_id,
                        height = number,
                        "node cannot serve a height referenced by stored neighbors"
                    );
                }
                Err(err) => {
                    warn!(chain_id, height = number, error = %err, "gap fetch failed");
                    first_failure.get_or_insert(err);
                }
            }
        }

        if !headers.is_empty() {
            let synced: Vec<BlockNumber> = headers.iter().map(|h| h.number).collect();
            let inserted = self.store.upsert_many(&headers).await?;
            info!(chain_id, inserted, heights = ?synced, "gap headers synced");
        }

        match first_failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

async fn with_deadline<T>(
    deadline: Duration,
    fut: impl std::future::Future<Output = Result<T, RpcError>>,
) -> Result<T, RpcError> {
    timeout(deadline, fut).await.map_err(|_| RpcError::Timeout)?
}

fn observe_lag(scheduled: Instant) {
    let lag = Instant::now().duration_since(scheduled);
    SCHEDULER_LAG_SECONDS.set(lag.as_secs_f64());
}
