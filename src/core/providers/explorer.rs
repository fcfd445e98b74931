//! Block explorer adapter (Etherscan family)
//!
//! Node methods are mapped onto the explorer's `module=proxy` REST actions,
//! `eth_getBalance` onto `module=account&action=balance`. Everything else is
//! rejected with `NotSupported` before any network I/O.

use super::base::{ConnectionPool, StatsTracker};
use super::unified_provider::ProviderError;
use crate::config::models::provider::{ProviderConfig, ProviderType};
use crate::core::traits::provider::RpcProvider;
use crate::core::types::{JsonRpcResponse, RpcCall, RpcError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// REST base url for a chain id
fn explorer_base_url(chain_id: u64) -> Option<&'static str> {
    Some(match chain_id {
        1 => "https://api.etherscan.io/api",
        11155111 => "https://api-sepolia.etherscan.io/api",
        137 => "https://api.polygonscan.com/api",
        42161 => "https://api.arbiscan.io/api",
        10 => "https://api-optimistic.etherscan.io/api",
        8453 => "https://api.basescan.org/api",
        56 => "https://api.bscscan.com/api",
        43114 => "https://api.snowscan.xyz/api",
        _ => return None,
    })
}

/// Query string pairs of one explorer request
type Query = Vec<(&'static str, String)>;

/// Render a JSON parameter the way the explorer expects it in a query string
fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Adapter for Etherscan-compatible explorer APIs
#[derive(Debug)]
pub struct ExplorerProvider {
    id: String,
    config: ProviderConfig,
    base_url: String,
    pool: ConnectionPool,
    tracker: StatsTracker,
    connected: AtomicBool,
}

impl ExplorerProvider {
    pub fn new(mut config: ProviderConfig) -> Result<Self, ProviderError> {
        let id = config.id();
        if config.provider_type != ProviderType::Etherscan {
            return Err(ProviderError::configuration(
                &id,
                format!("{} is not an explorer provider", config.provider_type),
            ));
        }

        let base_url = match &config.url {
            Some(url) => url.clone(),
            None => explorer_base_url(config.chain_id)
                .ok_or_else(|| {
                    ProviderError::configuration(
                        &id,
                        format!("no explorer known for chain {}, set an explicit url", config.chain_id),
                    )
                })?
                .to_string(),
        };
        config.cost_per_request = config.effective_cost_per_request();
        let pool = ConnectionPool::new(&id, config.timeout())?;

        Ok(Self {
            id,
            config,
            base_url,
            pool,
            tracker: StatsTracker::new(),
            connected: AtomicBool::new(false),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a call onto explorer query parameters
    fn build_query(&self, call: &RpcCall) -> Result<Query, ProviderError> {
        let params = &call.params;
        let required = |index: usize, name: &str| -> Result<String, ProviderError> {
            params.get(index).map(param_text).ok_or_else(|| {
                ProviderError::upstream(
                    &self.id,
                    RpcError::new(
                        RpcError::INVALID_PARAMS,
                        format!("{} requires parameter {} ({})", call.method, index, name),
                    ),
                )
            })
        };
        let tag_at = |index: usize| {
            params
                .get(index)
                .map(param_text)
                .unwrap_or_else(|| "latest".to_string())
        };

        let proxy = |action: &str| -> Query {
            vec![("module", "proxy".to_string()), ("action", action.to_string())]
        };

        let mut query = match call.method.as_str() {
            "eth_blockNumber" | "eth_gasPrice" => proxy(&call.method),
            "eth_getBlockByNumber" => {
                let mut q = proxy(&call.method);
                q.push(("tag", required(0, "block")?));
                q.push((
                    "boolean",
                    params.get(1).map(param_text).unwrap_or_else(|| "false".to_string()),
                ));
                q
            }
            "eth_getBlockTransactionCountByNumber" => {
                let mut q = proxy(&call.method);
                q.push(("tag", required(0, "block")?));
                q
            }
            "eth_getTransactionByHash" | "eth_getTransactionReceipt" => {
                let mut q = proxy(&call.method);
                q.push(("txhash", required(0, "hash")?));
                q
            }
            "eth_getTransactionCount" | "eth_getCode" => {
                let mut q = proxy(&call.method);
                q.push(("address", required(0, "address")?));
                q.push(("tag", tag_at(1)));
                q
            }
            "eth_getStorageAt" => {
                let mut q = proxy(&call.method);
                q.push(("address", required(0, "address")?));
                q.push(("position", required(1, "position")?));
                q.push(("tag", tag_at(2)));
                q
            }
            "eth_sendRawTransaction" => {
                let mut q = proxy(&call.method);
                q.push(("hex", required(0, "data")?));
                q
            }
            "eth_call" | "eth_estimateGas" => {
                let mut q = proxy(&call.method);
                let Some(Value::Object(tx)) = params.first() else {
                    return Err(ProviderError::upstream(
                        &self.id,
                        RpcError::new(
                            RpcError::INVALID_PARAMS,
                            format!("{} requires a transaction object", call.method),
                        ),
                    ));
                };
                for field in ["to", "data", "value", "gas", "gasPrice"] {
                    if let Some(value) = tx.get(field) {
                        q.push((field, param_text(value)));
                    }
                }
                if call.method == "eth_call" {
                    q.push(("tag", tag_at(1)));
                }
                q
            }
            "eth_getBalance" => vec![
                ("module", "account".to_string()),
                ("action", "balance".to_string()),
                ("address", required(0, "address")?),
                ("tag", tag_at(1)),
            ],
            other => return Err(ProviderError::not_supported(&self.id, other)),
        };

        query.push(("apikey", self.config.api_key.clone()));
        Ok(query)
    }

    /// Answer calls that only depend on configuration
    fn answer_locally(&self, call: &RpcCall) -> Option<Value> {
        match call.method.as_str() {
            "eth_chainId" => Some(Value::String(format!("{:#x}", self.config.chain_id))),
            "net_version" => Some(Value::String(self.config.chain_id.to_string())),
            _ => None,
        }
    }

    /// Answer locally or over the network; every path is tracked by the caller
    async fn serve(&self, call: &RpcCall) -> Result<Value, ProviderError> {
        if let Some(value) = self.answer_locally(call) {
            return Ok(value);
        }
        let query = self.build_query(call)?;
        self.execute(call, query).await
    }

    async fn execute(&self, call: &RpcCall, query: Query) -> Result<Value, ProviderError> {
        debug!(provider = %self.id, method = %call.method, "Sending explorer request");
        let body = self.pool.get_query(&self.base_url, &query).await?;
        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            ProviderError::invalid_response(&self.id, format!("undecodable explorer response: {}", e))
        })?;
        decode_explorer_response(&self.id, &call.method, value)
    }
}

/// Turn an explorer body into a JSON-RPC style result
fn decode_explorer_response(provider: &str, method: &str, value: Value) -> Result<Value, ProviderError> {
    // `status: "0"` is the explorer's own error envelope
    if value.get("status").and_then(Value::as_str) == Some("0") {
        let detail = value.get("result").map(param_text).unwrap_or_default();
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("NOTOK");
        let code = if detail.to_ascii_lowercase().contains("rate limit") {
            RpcError::LIMIT_EXCEEDED
        } else {
            -32000
        };
        return Err(ProviderError::upstream(
            provider,
            RpcError::new(code, format!("{}: {}", message, detail)),
        ));
    }

    if method == "eth_getBalance" {
        // Balance comes back as a decimal wei string
        let raw = value.get("result").map(param_text).unwrap_or_default();
        let wei: u128 = raw.parse().map_err(|_| {
            ProviderError::invalid_response(provider, format!("balance is not a number: {}", raw))
        })?;
        return Ok(Value::String(format!("{:#x}", wei)));
    }

    let response: JsonRpcResponse = serde_json::from_value(value).map_err(|e| {
        ProviderError::invalid_response(provider, format!("malformed proxy response: {}", e))
    })?;
    response
        .into_result()
        .map_err(|error| ProviderError::upstream(provider, error))
}

#[async_trait]
impl RpcProvider for ExplorerProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        self.connected.store(true, Ordering::SeqCst);
        info!(provider = %self.id, base_url = %self.base_url, "Explorer provider connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn request(&self, call: &RpcCall) -> Result<Value, ProviderError> {
        if !self.is_connected() {
            return Err(ProviderError::not_connected(&self.id));
        }
        self.tracker.track(self.serve(call)).await
    }

    fn tracker(&self) -> &StatsTracker {
        &self.tracker
    }
}
