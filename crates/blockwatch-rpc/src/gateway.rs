//! JSON-RPC gateway adapter.
//!
//! One endpoint per chain, resolved from the environment: chain 1 from
//! `RPC_ETH_MAINNET_URL` at startup, any other chain `<N>` from
//! `RPC_CHAIN_<N>_URL` on first use. A chain whose variable is absent or
//! empty surfaces `ChainUnknown`; there is no fallback to another chain's
//! transport. The per-chain endpoint map is append-only: concurrent readers
//! take the read lock, the single resolver of a new chain takes the write
//! lock once.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::StatusCode;
use tracing::debug;

use blockwatch_types::{well_known_chain_name, BlockNumber, ChainId, NewHeader};

use crate::error::RpcError;
use crate::json::{parse_quantity, to_quantity, JsonRpcRequest, JsonRpcResponse, RawBlock};
use crate::ports::RpcGateway;

const MAINNET_CHAIN_ID: ChainId = 1;
const MAINNET_URL_VAR: &str = "RPC_ETH_MAINNET_URL";

/// Gateway over JSON-RPC/HTTP endpoints.
pub struct JsonRpcGateway {
    http: reqwest::Client,
    endpoints: RwLock<HashMap<ChainId, Arc<str>>>,
    configured: Vec<ChainId>,
}

impl JsonRpcGateway {
    /// Build from the process environment, registering every chain with a
    /// `RPC_CHAIN_<N>_URL` (plus mainnet via `RPC_ETH_MAINNET_URL`) as
    /// configured.
    pub fn from_env() -> Self {
        let mut endpoints = HashMap::new();
        for (key, value) in std::env::vars() {
            if value.is_empty() {
                continue;
            }
            if key == MAINNET_URL_VAR {
                endpoints.insert(MAINNET_CHAIN_ID, Arc::from(value.as_str()));
            } else if let Some(chain_id) = chain_id_from_var(&key) {
                endpoints.insert(chain_id, Arc::from(value.as_str()));
            }
        }
        Self::with_endpoints(endpoints)
    }

    /// Build from an explicit endpoint map.
    pub fn with_endpoints(endpoints: HashMap<ChainId, Arc<str>>) -> Self {
        let mut configured: Vec<ChainId> = endpoints.keys().copied().collect();
        configured.sort_unstable();
        Self {
            http: reqwest::Client::new(),
            endpoints: RwLock::new(endpoints),
            configured,
        }
    }

    fn endpoint(&self, chain_id: ChainId) -> Result<Arc<str>, RpcError> {
        if let Some(url) = self.endpoints.read().get(&chain_id) {
            return Ok(url.clone());
        }

        // Lazy env consult on first use of a chain that was not present at
        // startup.
        let var = if chain_id == MAINNET_CHAIN_ID {
            MAINNET_URL_VAR.to_string()
        } else {
            format!("RPC_CHAIN_{chain_id}_URL")
        };
        let url = std::env::var(&var)
            .ok()
            .filter(|u| !u.is_empty())
            .ok_or(RpcError::ChainUnknown(chain_id))?;

        debug!(chain_id, %var, "resolved rpc endpoint");
        let mut endpoints = self.endpoints.write();
        let entry = endpoints
            .entry(chain_id)
            .or_insert_with(|| Arc::from(url.as_str()));
        Ok(entry.clone())
    }

    async fn call(
        &self,
        chain_id: ChainId,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let url = self.endpoint(chain_id)?;
        let request = JsonRpcRequest::new(method, params);

        let response = self
            .http
            .post(url.as_ref())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(RpcError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(RpcError::Unavailable(format!(
                "http status {}",
                response.status()
            )));
        }

        let body: JsonRpcResponse = response.json().await.map_err(map_transport_error)?;
        if let Some(err) = body.error {
            return Err(RpcError::Unavailable(format!(
                "rpc error {}: {}",
                err.code, err.message
            )));
        }
        Ok(body.result.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl RpcGateway for JsonRpcGateway {
    fn configured_chain_ids(&self) -> Vec<ChainId> {
        self.configured.clone()
    }

    fn chain_name(&self, chain_id: ChainId) -> String {
        well_known_chain_name(chain_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("chain-{chain_id}"))
    }

    async fn head_number(&self, chain_id: ChainId) -> Result<BlockNumber, RpcError> {
        let result = self
            .call(chain_id, "eth_blockNumber", serde_json::json!([]))
            .await?;
        let raw = result
            .as_str()
            .ok_or_else(|| RpcError::Unavailable("non-string block number".to_string()))?;
        parse_quantity(raw)
    }

    async fn block_by_number(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<NewHeader, RpcError> {
        let result = self
            .call(
                chain_id,
                "eth_getBlockByNumber",
                serde_json::json!([to_quantity(number), false]),
            )
            .await?;
        if result.is_null() {
            return Err(RpcError::NotFound);
        }

        let raw: RawBlock = serde_json::from_value(result)
            .map_err(|e| RpcError::Unavailable(format!("malformed block: {e}")))?;
        header_from_raw(chain_id, raw)
    }
}

/// Reject partially populated blocks: the node momentarily serving a header
/// without its hashes is indistinguishable from a broken node, and a record
/// with holes must never reach the store.
fn header_from_raw(chain_id: ChainId, raw: RawBlock) -> Result<NewHeader, RpcError> {
    let number = raw
        .number
        .as_deref()
        .ok_or_else(|| partial("number"))
        .and_then(parse_quantity)?;
    let hash = raw.hash.filter(|h| !h.is_empty()).ok_or_else(|| partial("hash"))?;
    let parent_hash = raw
        .parent_hash
        .filter(|h| !h.is_empty())
        .ok_or_else(|| partial("parentHash"))?;
    let timestamp = raw
        .timestamp
        .as_deref()
        .ok_or_else(|| partial("timestamp"))
        .and_then(parse_quantity)?;
    let timestamp = u32::try_from(timestamp)
        .map_err(|_| RpcError::Unavailable(format!("timestamp {timestamp} out of range")))?;

    Ok(NewHeader {
        chain_id,
        number,
        hash,
        parent_hash,
        timestamp,
    })
}

fn partial(field: &str) -> RpcError {
    RpcError::Unavailable(format!("partial header: missing {field}"))
}

fn map_transport_error(err: reqwest::Error) -> RpcError {
    if err.is_timeout() {
        RpcError::Timeout
    } else {
        RpcError::Unavailable(err.to_string())
    }
}

fn chain_id_from_var(key: &str) -> Option<ChainId> {
    key.strip_prefix("RPC_CHAIN_")?
        .strip_suffix("_URL")?
        .parse()
        .ok()
}
