//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GatewayConfig {
    /// Upstream providers
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Router configuration
    #[serde(default)]
    pub router: RouterConfig,
    /// Caching configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Failover configuration
    #[serde(default)]
    pub retry: RetryConfig,
    /// Health monitoring configuration
    #[serde(default)]
    pub health_check: HealthCheckConfig,
}

impl GatewayConfig {
    /// Build a configuration from environment variables alone
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `GATEWAY_*` overrides and fill empty API keys from `{TYPE}_API_KEY`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("GATEWAY_STRATEGY") {
            self.router.strategy =
                LoadBalancingStrategy::from_str(&value).map_err(GatewayError::Config)?;
        }
        if let Some(value) = lookup("GATEWAY_MAX_RETRIES") {
            self.retry.max_retries = parse_env("GATEWAY_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("GATEWAY_RETRY_DELAY_MS") {
            self.retry.retry_delay_ms = parse_env("GATEWAY_RETRY_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("GATEWAY_CACHE_ENABLED") {
            self.cache.enabled = parse_env("GATEWAY_CACHE_ENABLED", &value)?;
        }
        if let Some(value) = lookup("GATEWAY_HEALTH_CHECK_INTERVAL_SECS") {
            self.health_check.interval_secs =
                parse_env("GATEWAY_HEALTH_CHECK_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = lookup("GATEWAY_HEALTH_CHECK_ENABLED") {
            self.health_check.enabled = parse_env("GATEWAY_HEALTH_CHECK_ENABLED", &value)?;
        }

        for provider in &mut self.providers {
            if provider.api_key.is_empty() {
                let var = provider.provider_type.api_key_env_var();
                if let Some(key) = lookup(&var) {
                    debug!(provider = %provider.id(), env = %var, "Using API key from environment");
                    provider.api_key = key;
                }
            }
        }

        Ok(())
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| GatewayError::Config(format!("Invalid value for {}: {}", name, e)))
}
