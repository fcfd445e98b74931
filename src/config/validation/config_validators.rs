//! Core configuration validators
//!
//! This module provides validation implementations for the main gateway configuration
//! structures, GatewayConfig and ProviderConfig.

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        // Check for duplicate provider ids
        let mut provider_ids = HashSet::new();
        for provider in &self.providers {
            let id = provider.id();
            if !provider_ids.insert(id.clone()) {
                return Err(format!("Duplicate provider id: {}", id));
            }
            provider.validate()?;
        }

        self.cache.validate()?;
        self.retry.validate()?;
        self.health_check.validate()?;

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating provider configuration: {}", self.name);

        if self.name.trim().is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        if self.provider_type.requires_api_key() && self.api_key.trim().is_empty() {
            return Err(format!(
                "Provider {} API key cannot be empty (set it in the config or {})",
                self.name,
                self.provider_type.api_key_env_var()
            ));
        }

        match &self.url {
            Some(url) => validate_endpoint_url(url, &self.name)?,
            None if self.provider_type.requires_url() => {
                return Err(format!(
                    "Provider {} of type {} requires a url",
                    self.name, self.provider_type
                ));
            }
            None => {}
        }

        if self.chain_id == 0 {
            return Err(format!("Provider {} chain id must be greater than 0", self.name));
        }

        if self.timeout_ms == 0 {
            return Err(format!("Provider {} timeout must be greater than 0", self.name));
        }

        if self.weight > MAX_PROVIDER_WEIGHT {
            return Err(format!(
                "Provider {} weight must be at most {}",
                self.name, MAX_PROVIDER_WEIGHT
            ));
        }

        if let Some(rate_limit) = &self.rate_limit {
            rate_limit
                .validate()
                .map_err(|e| format!("Provider {}: {}", self.name, e))?;
        }

        if let Some(cost) = self.cost_per_request {
            if !cost.is_finite() || cost < 0.0 {
                return Err(format!(
                    "Provider {} cost per request must be a non-negative number",
                    self.name
                ));
            }
        }

        Ok(())
    }
}

fn validate_endpoint_url(raw: &str, provider: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| format!("Provider {} url is invalid: {}", provider, e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "Provider {} url must use http or https, got {}",
                provider, other
            ));
        }
    }

    if parsed.host_str().is_none() {
        return Err(format!("Provider {} url has no host", provider));
    }

    Ok(())
}
