//! Managed node services (Alchemy, Infura, QuickNode)
//!
//! Hosted JSON-RPC endpoints keyed by an API key. The endpoint is derived from
//! the chain id unless the configuration names one explicitly.

use super::base::StatsTracker;
use super::json_rpc::JsonRpcClient;
use super::unified_provider::ProviderError;
use crate::config::models::provider::{ProviderConfig, ProviderType};
use crate::core::traits::provider::{BatchResult, RpcProvider};
use crate::core::types::RpcCall;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Alchemy network slug for a chain id
fn alchemy_network(chain_id: u64) -> Option<&'static str> {
    Some(match chain_id {
        1 => "eth-mainnet",
        11155111 => "eth-sepolia",
        137 => "polygon-mainnet",
        42161 => "arb-mainnet",
        10 => "opt-mainnet",
        8453 => "base-mainnet",
        43114 => "avax-mainnet",
        _ => return None,
    })
}

/// Infura network slug for a chain id
fn infura_network(chain_id: u64) -> Option<&'static str> {
    Some(match chain_id {
        1 => "mainnet",
        11155111 => "sepolia",
        137 => "polygon-mainnet",
        42161 => "arbitrum-mainnet",
        10 => "optimism-mainnet",
        43114 => "avalanche-mainnet",
        _ => return None,
    })
}

/// Endpoint for a managed provider
pub fn managed_endpoint(config: &ProviderConfig) -> Result<String, ProviderError> {
    if let Some(url) = &config.url {
        return Ok(url.clone());
    }

    let unsupported = || {
        ProviderError::configuration(
            config.id(),
            format!(
                "chain {} is not supported by {}, set an explicit url",
                config.chain_id, config.provider_type
            ),
        )
    };

    match config.provider_type {
        ProviderType::Alchemy => {
            let network = alchemy_network(config.chain_id).ok_or_else(unsupported)?;
            Ok(format!("https://{}.g.alchemy.com/v2/{}", network, config.api_key))
        }
        ProviderType::Infura => {
            let network = infura_network(config.chain_id).ok_or_else(unsupported)?;
            Ok(format!("https://{}.infura.io/v3/{}", network, config.api_key))
        }
        ProviderType::Quicknode => Err(ProviderError::configuration(
            config.id(),
            "quicknode requires an explicit url",
        )),
        ProviderType::Etherscan | ProviderType::Custom => Err(ProviderError::configuration(
            config.id(),
            format!("{} is not a managed node provider", config.provider_type),
        )),
    }
}

/// Hosted node service adapter
#[derive(Debug)]
pub struct ManagedNodeProvider {
    id: String,
    config: ProviderConfig,
    client: JsonRpcClient,
    tracker: StatsTracker,
    connected: AtomicBool,
}

impl ManagedNodeProvider {
    pub fn new(mut config: ProviderConfig) -> Result<Self, ProviderError> {
        let id = config.id();
        if !config.provider_type.is_managed() {
            return Err(ProviderError::configuration(
                &id,
                format!("{} is not a managed node provider", config.provider_type),
            ));
        }

        let endpoint = managed_endpoint(&config)?;
        config.cost_per_request = config.effective_cost_per_request();
        let client = JsonRpcClient::new(&id, endpoint, config.timeout())?;

        Ok(Self {
            id,
            config,
            client,
            tracker: StatsTracker::new(),
            connected: AtomicBool::new(false),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    fn ensure_connected(&self) -> Result<(), ProviderError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ProviderError::not_connected(&self.id))
        }
    }
}

#[async_trait]
impl RpcProvider for ManagedNodeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        self.connected.store(true, Ordering::SeqCst);
        info!(provider = %self.id, chain_id = self.config.chain_id, "Managed provider connected");
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
        self.ensure_connected()?;
        self.tracker.track(self.client.call(call)).await
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn batch(&self, calls: &[RpcCall]) -> Result<BatchResult, ProviderError> {
        self.ensure_connected()?;
        self.tracker.track(self.client.batch(calls)).await
    }

    fn tracker(&self) -> &StatsTracker {
        &self.tracker
    }
}
