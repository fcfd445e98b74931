//! Shared request/response types
//!
//! - `rpc` - calls, structured errors and JSON-RPC envelopes
//! - `methods` - closed method table and cache policies

pub mod methods;
pub mod rpc;

pub use methods::{CachePolicy, RpcMethod, cache_policy_for, is_side_effecting};
pub use rpc::{
    JsonRpcRequest, JsonRpcResponse, RpcCall, RpcError, parse_hex_quantity, parse_hex_u128,
};
