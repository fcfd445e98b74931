//! JSON-RPC call and error types
//!
//! `RpcCall` is the unit of work flowing through the gateway. It is built once
//! by the caller and only ever borrowed afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single JSON-RPC style call: method name plus ordered parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcCall {
    /// Method name, e.g. `eth_getBalance`
    pub method: String,
    /// Positional parameters
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RpcCall {
    /// Create a new call
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Create a call without parameters
    pub fn without_params(method: impl Into<String>) -> Self {
        Self::new(method, Vec::new())
    }

    /// Serialized parameter list, used for cache keys and logging
    pub fn params_json(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_else(|_| "[]".to_string())
    }
}

impl fmt::Display for RpcCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.method, self.params_json())
    }
}

/// Structured JSON-RPC error returned by an upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("JSON-RPC error {code}: {message}")]
pub struct RpcError {
    /// Error code
    pub code: i64,
    /// Human readable message
    pub message: String,
    /// Optional extra payload (revert data and the like)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const RESOURCE_UNAVAILABLE: i64 = -32002;
    pub const LIMIT_EXCEEDED: i64 = -32005;

    /// Create a new error without data
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach a data payload
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether a different provider might answer the same call successfully
    ///
    /// Invalid params or execution errors are properties of the call itself
    /// and will fail identically everywhere.
    pub fn is_retryable_elsewhere(&self) -> bool {
        matches!(
            self.code,
            Self::METHOD_NOT_FOUND
                | Self::INTERNAL_ERROR
                | Self::RESOURCE_UNAVAILABLE
                | Self::LIMIT_EXCEEDED
        )
    }
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a [Value],
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(id: u64, call: &'a RpcCall) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: &call.method,
            params: &call.params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    /// Numeric id of the response, if the upstream echoed one
    pub fn numeric_id(&self) -> Option<u64> {
        match self.id.as_ref()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Split the envelope into a result or a structured error
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Decode a `0x`-prefixed hex quantity
pub fn parse_hex_quantity(value: &Value) -> Option<u64> {
    parse_hex_u128(value).and_then(|n| u64::try_from(n).ok())
}

/// Decode a hex quantity that may not fit 64 bits, such as a wei balance
pub fn parse_hex_u128(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => {
            let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
            if digits.is_empty() {
                return Some(0);
            }
            u128::from_str_radix(digits, 16).ok()
        }
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}
