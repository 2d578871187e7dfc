//! Gateway error taxonomy.

use blockwatch_types::ChainId;
use thiserror::Error;

/// Errors surfaced by the RPC gateway.
///
/// All variants except `ChainUnknown` are transient: the caller abandons the
/// current work unit and the next tick is the retry. `ChainUnknown` is a
/// configuration error and persists until the environment changes.
#[derive(Clone, Debug, Error)]
pub enum RpcError {
    /// Transport failure or a protocol violation from the node.
    #[error("rpc unavailable: {0}")]
    Unavailable(String),

    /// The caller-imposed deadline expired.
    #[error("rpc request timed out")]
    Timeout,

    /// The node rejected the request for rate limiting.
    #[error("rpc rate limited")]
    RateLimited,

    /// No endpoint is configured for this chain.
    #[error("chain {0} is not configured")]
    ChainUnknown(ChainId),

    /// The requested block does not exist on the node.
    #[error("block not found")]
    NotFound,
}
