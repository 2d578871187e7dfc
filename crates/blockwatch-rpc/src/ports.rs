//! # Gateway Port
//!
//! The read surface the scheduler consumes. Implementations: the JSON-RPC
//! gateway for production, the scripted mock for tests.

use async_trait::async_trait;

use blockwatch_types::{BlockNumber, ChainId, NewHeader};

use crate::error::RpcError;

/// Chain-agnostic read interface to EVM chains.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    /// Chain ids known at startup.
    fn configured_chain_ids(&self) -> Vec<ChainId>;

    /// Human name for log and metric labels; unknown chains yield a
    /// synthetic `chain-<id>` name.
    fn chain_name(&self, chain_id: ChainId) -> String;

    /// Current tip height of the chain.
    async fn head_number(&self, chain_id: ChainId) -> Result<BlockNumber, RpcError>;

    /// Fully populated header at a height, or [`RpcError::NotFound`].
    ///
    /// A partially populated header from the node is a protocol violation
    /// and is surfaced as [`RpcError::Unavailable`], never as a record with
    /// holes.
    async fn block_by_number(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<NewHeader, RpcError>;
}
