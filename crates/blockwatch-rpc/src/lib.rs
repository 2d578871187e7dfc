//! # RPC Gateway
//!
//! Uniform read interface to one or more EVM chains, so the scheduler never
//! touches a concrete client library. The gateway resolves one JSON-RPC
//! endpoint per chain from the environment (lazily, on first use), caches a
//! transport per chain, and exposes exactly two chain reads: current head
//! number and header by number.

pub mod error;
pub mod gateway;
pub mod json;
pub mod mock;
pub mod ports;

pub use error::RpcError;
pub use gateway::JsonRpcGateway;
pub use mock::ScriptedRpc;
pub use ports::RpcGateway;
