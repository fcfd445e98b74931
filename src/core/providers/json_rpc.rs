//! JSON-RPC 2.0 over HTTP transport
//!
//! Shared by every node-style adapter. One POST per call, or one POST carrying a
//! JSON array for a native batch.

use super::base::ConnectionPool;
use super::unified_provider::ProviderError;
use crate::core::types::{JsonRpcRequest, JsonRpcResponse, RpcCall, RpcError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// JSON-RPC client bound to one endpoint
#[derive(Debug)]
pub struct JsonRpcClient {
    provider_id: String,
    endpoint: String,
    pool: ConnectionPool,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(
        provider_id: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let provider_id = provider_id.into();
        let pool = ConnectionPool::new(&provider_id, timeout)?;
        Ok(Self {
            provider_id,
            endpoint: endpoint.into(),
            pool,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Reserve `count` consecutive request ids
    fn reserve_ids(&self, count: u64) -> u64 {
        self.next_id.fetch_add(count, Ordering::Relaxed)
    }

    /// Send a single call
    pub async fn call(&self, call: &RpcCall) -> Result<Value, ProviderError> {
        let id = self.reserve_ids(1);
        let request = JsonRpcRequest::new(id, call);
        debug!(provider = %self.provider_id, id, method = %call.method, "Sending JSON-RPC request");

        let body = self.pool.post_json(&self.endpoint, &request).await?;
        let response: JsonRpcResponse = serde_json::from_slice(&body).map_err(|e| {
            ProviderError::invalid_response(
                &self.provider_id,
                format!("undecodable JSON-RPC response: {}", e),
            )
        })?;

        response
            .into_result()
            .map_err(|error| ProviderError::upstream(&self.provider_id, error))
    }

    /// Send calls as one JSON array, returning results in input order
    pub async fn batch(&self, calls: &[RpcCall]) -> Result<Vec<Result<Value, RpcError>>, ProviderError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let first_id = self.reserve_ids(calls.len() as u64);
        let requests: Vec<JsonRpcRequest<'_>> = calls
            .iter()
            .enumerate()
            .map(|(offset, call)| JsonRpcRequest::new(first_id + offset as u64, call))
            .collect();
        debug!(provider = %self.provider_id, size = calls.len(), "Sending JSON-RPC batch");

        let body = self.pool.post_json(&self.endpoint, &requests).await?;
        let responses = decode_batch(&self.provider_id, &body)?;

        let mut by_id: HashMap<u64, JsonRpcResponse> = responses
            .into_iter()
            .filter_map(|response| response.numeric_id().map(|id| (id, response)))
            .collect();

        Ok((0..calls.len() as u64)
            .map(|offset| match by_id.remove(&(first_id + offset)) {
                Some(response) => response.into_result(),
                None => Err(RpcError::new(
                    RpcError::INTERNAL_ERROR,
                    "missing response for batch entry",
                )),
            })
            .collect())
    }
}

/// Decode a batch body; a single error object fails the whole batch
fn decode_batch(provider_id: &str, body: &[u8]) -> Result<Vec<JsonRpcResponse>, ProviderError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ProviderError::invalid_response(provider_id, format!("undecodable batch response: {}", e))
    })?;

    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| {
            ProviderError::invalid_response(provider_id, format!("malformed batch entry: {}", e))
        }),
        Value::Object(_) => {
            let single: JsonRpcResponse = serde_json::from_value(value).map_err(|e| {
                ProviderError::invalid_response(provider_id, format!("malformed response: {}", e))
            })?;
            match single.error {
                Some(error) => Err(ProviderError::upstream(provider_id, error)),
                None => Err(ProviderError::invalid_response(
                    provider_id,
                    "expected an array for a batch request",
                )),
            }
        }
        _ => Err(ProviderError::invalid_response(
            provider_id,
            "unexpected batch response shape",
        )),
    }
}
