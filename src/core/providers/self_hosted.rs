//! Self-hosted node adapter (`custom` provider type)

use super::base::StatsTracker;
use super::json_rpc::JsonRpcClient;
use super::unified_provider::ProviderError;
use crate::config::models::provider::{ProviderConfig, ProviderType};
use crate::core::traits::provider::{BatchResult, RpcProvider};
use crate::core::types::{RpcCall, parse_hex_quantity};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Adapter for a node the wallet operator runs, reached at an explicit url
#[derive(Debug)]
pub struct SelfHostedProvider {
    id: String,
    config: ProviderConfig,
    client: JsonRpcClient,
    tracker: StatsTracker,
    connected: AtomicBool,
}

impl SelfHostedProvider {
    pub fn new(mut config: ProviderConfig) -> Result<Self, ProviderError> {
        let id = config.id();
        if config.provider_type != ProviderType::Custom {
            return Err(ProviderError::configuration(
                &id,
                format!("{} is not a self-hosted provider", config.provider_type),
            ));
        }

        let Some(endpoint) = config.url.clone() else {
            return Err(ProviderError::configuration(&id, "self-hosted node requires a url"));
        };
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
impl RpcProvider for SelfHostedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Verify the node serves the configured chain when it is reachable
    async fn connect(&self) -> Result<(), ProviderError> {
        match self.client.call(&RpcCall::without_params("eth_chainId")).await {
            Ok(value) => {
                let reported = parse_hex_quantity(&value);
                if reported.is_some_and(|chain_id| chain_id != self.config.chain_id) {
                    return Err(ProviderError::configuration(
                        &self.id,
                        format!(
                            "node reports chain {:?}, configured chain is {}",
                            reported, self.config.chain_id
                        ),
                    ));
                }
            }
            Err(error) => {
                // Health checks take over from here
                warn!(provider = %self.id, error = %error, "Self-hosted node not reachable on connect");
            }
        }

        self.connected.store(true, Ordering::SeqCst);
        info!(provider = %self.id, endpoint = %self.client.endpoint(), "Self-hosted provider connected");
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
