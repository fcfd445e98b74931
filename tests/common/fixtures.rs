//! Test fixtures and configuration factories
//!
//! Factories return valid configurations with test-friendly defaults: short
//! retry delays and no background health loop.

use rpc_gateway::{
    GatewayConfig, HealthCheckConfig, LoadBalancingStrategy, ProviderConfig, ProviderType,
    RetryConfig, RouterConfig,
};

/// Endpoint nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Factory for provider configurations
pub struct ProviderConfigFactory;

impl ProviderConfigFactory {
    /// Self-hosted node at an unreachable endpoint
    pub fn custom(name: &str) -> ProviderConfig {
        ProviderConfig::new(name, ProviderType::Custom).with_url(UNREACHABLE_URL)
    }

    /// Self-hosted node at `url`
    pub fn node_at(name: &str, url: &str) -> ProviderConfig {
        ProviderConfig::new(name, ProviderType::Custom).with_url(url)
    }

    /// Managed node service with a test API key
    pub fn managed(name: &str, provider_type: ProviderType) -> ProviderConfig {
        ProviderConfig::new(name, provider_type).with_api_key("test-key")
    }

    /// Block explorer with a test API key
    pub fn explorer(name: &str) -> ProviderConfig {
        ProviderConfig::new(name, ProviderType::Etherscan).with_api_key("test-key")
    }

    pub fn rate_limited(name: &str, requests: u32, window_ms: u64) -> ProviderConfig {
        Self::custom(name).with_rate_limit(requests, window_ms)
    }
}

/// Factory for gateway configurations
pub struct GatewayConfigFactory;

impl GatewayConfigFactory {
    /// Round-robin, three attempts 10ms apart, health loop off
    pub fn create() -> GatewayConfig {
        GatewayConfig {
            router: RouterConfig::default(),
            retry: RetryConfig {
                max_retries: 3,
                retry_delay_ms: 10,
            },
            health_check: HealthCheckConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_strategy(strategy: LoadBalancingStrategy) -> GatewayConfig {
        let mut config = Self::create();
        config.router.strategy = strategy;
        config
    }

    pub fn with_retries(max_retries: u32, retry_delay_ms: u64) -> GatewayConfig {
        let mut config = Self::create();
        config.retry = RetryConfig {
            max_retries,
            retry_delay_ms,
        };
        config
    }

    pub fn without_cache() -> GatewayConfig {
        let mut config = Self::create();
        config.cache.enabled = false;
        config
    }
}

/// A complete configuration file exercising every section
pub const SAMPLE_YAML: &str = r#"
providers:
  - name: primary
    type: alchemy
    api_key: alchemy-key
    chain_id: 1
    weight: 3
    priority: 1
    rate_limit:
      requests: 25
      window_ms: 1000
  - name: backup
    type: infura
    priority: 2
  - name: node
    type: custom
    url: http://10.0.0.5:8545
    priority: 3
    timeout_ms: 5000
router:
  strategy: priority
cache:
  enabled: true
  short_ttl_secs: 2
  max_entries: 500
retry:
  max_retries: 4
  retry_delay_ms: 250
health_check:
  enabled: true
  interval_secs: 15
"#;
