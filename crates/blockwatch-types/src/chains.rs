//! Chain identifiers and human-readable chain names.

/// EVM chain identifier (e.g. 1 for Ethereum mainnet, 137 for Polygon).
pub type ChainId = i32;

/// Human name for a well-known chain, if we carry one.
///
/// Names are used for log and metric labels only; they never participate in
/// routing or persistence.
pub fn well_known_chain_name(chain_id: ChainId) -> Option<&'static str> {
    match chain_id {
        1 => Some("Ethereum Mainnet"),
        5 => Some("Goerli"),
        10 => Some("OP Mainnet"),
        56 => Some("BNB Smart Chain"),
        100 => Some("Gnosis"),
        137 => Some("Polygon"),
        8453 => Some("Base"),
        42161 => Some("Arbitrum One"),
        43114 => Some("Avalanche C-Chain"),
        11155111 => Some("Sepolia"),
        _ => None,
    }
}
