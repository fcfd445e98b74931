//! Provider configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Kind of upstream service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Alchemy,
    Infura,
    Quicknode,
    Etherscan,
    Custom,
}

impl ProviderType {
    pub const ALL: [ProviderType; 5] = [
        ProviderType::Alchemy,
        ProviderType::Infura,
        ProviderType::Quicknode,
        ProviderType::Etherscan,
        ProviderType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Alchemy => "alchemy",
            ProviderType::Infura => "infura",
            ProviderType::Quicknode => "quicknode",
            ProviderType::Etherscan => "etherscan",
            ProviderType::Custom => "custom",
        }
    }

    /// Hosted node services speaking JSON-RPC
    pub fn is_managed(&self) -> bool {
        matches!(
            self,
            ProviderType::Alchemy | ProviderType::Infura | ProviderType::Quicknode
        )
    }

    /// Endpoint cannot be derived from the chain id
    pub fn requires_url(&self) -> bool {
        matches!(self, ProviderType::Quicknode | ProviderType::Custom)
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(
            self,
            ProviderType::Alchemy | ProviderType::Infura | ProviderType::Etherscan
        )
    }

    /// Published price per request in USD
    ///
    /// Explorers have no price, which keeps them out of cost-optimized routing
    /// unless a cost is configured explicitly.
    pub fn default_cost_per_request(&self) -> Option<f64> {
        match self {
            ProviderType::Alchemy => Some(0.12 / 1000.0),
            ProviderType::Infura => Some(0.10 / 1000.0),
            ProviderType::Quicknode => Some(0.15 / 1000.0),
            ProviderType::Etherscan => None,
            ProviderType::Custom => Some(0.05 / 1000.0),
        }
    }

    /// Environment variable holding the API key, e.g. `ALCHEMY_API_KEY`
    pub fn api_key_env_var(&self) -> String {
        format!("{}_API_KEY", self.as_str().to_ascii_uppercase())
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown provider type: {}", s))
    }
}

/// Largest accepted load balancing weight
pub const MAX_PROVIDER_WEIGHT: u32 = 1000;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Provider name, unique per type
    pub name: String,
    /// Provider type
    #[serde(rename = "type", alias = "provider_type")]
    pub provider_type: ProviderType,
    /// API key, filled from `{TYPE}_API_KEY` when empty
    #[serde(default)]
    pub api_key: String,
    /// Explicit endpoint, overrides the derived one
    #[serde(default)]
    pub url: Option<String>,
    /// Chain served by this provider
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Weight for weighted round-robin
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Priority, lower is preferred
    #[serde(default = "default_priority")]
    pub priority: u32,
    /// Local token bucket
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Price per request, defaults to the provider type's price
    #[serde(default)]
    pub cost_per_request: Option<f64>,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, provider_type: ProviderType) -> Self {
        Self {
            name: name.into(),
            provider_type,
            api_key: String::new(),
            url: None,
            chain_id: default_chain_id(),
            weight: default_weight(),
            priority: default_priority(),
            rate_limit: None,
            timeout_ms: default_timeout_ms(),
            cost_per_request: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_rate_limit(mut self, requests: u32, window_ms: u64) -> Self {
        self.rate_limit = Some(RateLimitConfig::new(requests, window_ms));
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_cost_per_request(mut self, cost: f64) -> Self {
        self.cost_per_request = Some(cost);
        self
    }

    /// Provider id, `{type}_{name}`
    pub fn id(&self) -> String {
        format!("{}_{}", self.provider_type, self.name)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured cost, falling back to the provider type's price
    pub fn effective_cost_per_request(&self) -> Option<f64> {
        self.cost_per_request
            .or_else(|| self.provider_type.default_cost_per_request())
    }
}
