//! Scripted gateway for tests.
//!
//! Heads, headers, and failures are installed up front; the mock then
//! answers like a node would. Unknown chains yield `ChainUnknown`, unknown
//! heights yield `NotFound`.

use std::collections::HashMap;

use async_trait::async_trait;

use blockwatch_types::{well_known_chain_name, BlockNumber, ChainId, NewHeader};

use crate::error::RpcError;
use crate::ports::RpcGateway;

/// Test double with pre-scripted responses.
#[derive(Default)]
pub struct ScriptedRpc {
    chains: Vec<ChainId>,
    heads: HashMap<ChainId, Result<BlockNumber, RpcError>>,
    blocks: HashMap<(ChainId, BlockNumber), Result<NewHeader, RpcError>>,
}

impl ScriptedRpc {
    /// A mock that knows the given chains and nothing else.
    pub fn new(chains: Vec<ChainId>) -> Self {
        Self {
            chains,
            ..Self::default()
        }
    }

    /// Script the chain's head height.
    pub fn with_head(mut self, chain_id: ChainId, head: BlockNumber) -> Self {
        self.heads.insert(chain_id, Ok(head));
        self
    }

    /// Script `head_number` to fail for the chain.
    pub fn with_head_error(mut self, chain_id: ChainId, error: RpcError) -> Self {
        self.heads.insert(chain_id, Err(error));
        self
    }

    /// Script a header response.
    pub fn with_block(mut self, header: NewHeader) -> Self {
        self.blocks
            .insert((header.chain_id, header.number), Ok(header));
        self
    }

    /// Script `block_by_number` to fail for one height.
    pub fn with_block_error(
        mut self,
        chain_id: ChainId,
        number: BlockNumber,
        error: RpcError,
    ) -> Self {
        self.blocks.insert((chain_id, number), Err(error));
        self
    }

    /// Script a conventional mock header (`hash = "0xmock_<n>"`) for a range
    /// of heights.
    pub fn with_mock_blocks(
        mut self,
        chain_id: ChainId,
        numbers: impl IntoIterator<Item = BlockNumber>,
    ) -> Self {
        for number in numbers {
            self = self.with_block(mock_header(chain_id, number));
        }
        self
    }
}

/// A synthetic but fully populated header for tests.
pub fn mock_header(chain_id: ChainId, number: BlockNumber) -> NewHeader {
    NewHeader {
        chain_id,
        number,
        hash: format!("0xmock_{number}"),
        parent_hash: format!("0xmock_{}", number.wrapping_sub(1)),
        timestamp: 1_700_000_000u32.wrapping_add(number as u32),
    }
}

#[async_trait]
impl RpcGateway for ScriptedRpc {
    fn configured_chain_ids(&self) -> Vec<ChainId> {
        self.chains.clone()
    }

    fn chain_name(&self, chain_id: ChainId) -> String {
        well_known_chain_name(chain_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("chain-{chain_id}"))
    }

    async fn head_number(&self, chain_id: ChainId) -> Result<BlockNumber, RpcError> {
        self.heads
            .get(&chain_id)
            .cloned()
            .unwrap_or(Err(RpcError::ChainUnknown(chain_id)))
    }

    async fn block_by_number(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<NewHeader, RpcError> {
        if !self.chains.contains(&chain_id) {
            return Err(RpcError::ChainUnknown(chain_id));
        }
        self.blocks
            .get(&(chain_id, number))
            .cloned()
            .unwrap_or(Err(RpcError::NotFound))
    }
}
