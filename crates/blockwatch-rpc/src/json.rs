//! JSON-RPC wire shapes and hex-quantity decoding.

use serde::{Deserialize, Serialize};

use crate::error::RpcError;

#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    pub result: Option<serde_json::Value>,
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `eth_getBlockByNumber` result, reduced to the header fields we persist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBlock {
    pub number: Option<String>,
    pub hash: Option<String>,
    pub parent_hash: Option<String>,
    pub timestamp: Option<String>,
}

/// Decode an EVM hex quantity (`0x`-prefixed, no leading zeros required).
pub(crate) fn parse_quantity(raw: &str) -> Result<u64, RpcError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if digits.is_empty() {
        return Err(RpcError::Unavailable(format!("malformed quantity {raw:?}")));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|_| RpcError::Unavailable(format!("malformed quantity {raw:?}")))
}

/// Format a height as an EVM hex quantity.
pub(crate) fn to_quantity(number: u64) -> String {
    format!("0x{number:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1388").unwrap(), 5000);
        assert_eq!(parse_quantity("0xffffffffffffffff").unwrap(), u64::MAX);
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_quantity_round_trip() {
        assert_eq!(to_quantity(5000), "0x1388");
        assert_eq!(parse_quantity(&to_quantity(19_000_000)).unwrap(), 19_000_000);
    }
}
