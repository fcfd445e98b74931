//! Provider manager
//!
//! Entry point for wallet services. A [`ProviderManager`] owns the provider
//! registry, one rate limiter per rate-limited provider, the load balancer and
//! the response cache, and runs every logical call through them:
//!
//! cache lookup, provider selection, admission, upstream call under timeout,
//! then cache write-through and metrics, or failover with backoff.
//!
//! The manager is shared behind an `Arc`; background tasks only keep a weak
//! reference and stop once the last strong reference is gone.

mod batch;
mod convenience;
mod execution;
mod health;


use crate::config::models::gateway::GatewayConfig;
use crate::config::validation::Validate;
use crate::core::cache_manager::{CacheStats, ResponseCache};
use crate::core::providers::base::ProviderStats;
use crate::core::providers::{ProviderRegistry, create_provider};
use crate::core::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::core::router::{LoadBalancer, ProviderMetrics};
use crate::core::traits::provider::RpcProvider;
use crate::utils::error::{GatewayError, Result};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Multi-provider JSON-RPC gateway
pub struct ProviderManager {
    config: GatewayConfig,
    registry: RwLock<ProviderRegistry>,
    balancer: LoadBalancer,
    cache: Arc<ResponseCache>,
    limiters: DashMap<String, Arc<RateLimiter>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ProviderManager {
    /// Create an empty manager; providers are added with [`register_provider`](Self::register_provider)
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.cache.validate().map_err(GatewayError::config)?;
        config.retry.validate().map_err(GatewayError::config)?;
        config.health_check.validate().map_err(GatewayError::config)?;

        Ok(Self {
            balancer: LoadBalancer::new(config.router.strategy),
            cache: Arc::new(ResponseCache::new(config.cache.clone())),
            registry: RwLock::new(ProviderRegistry::new()),
            limiters: DashMap::new(),
            tasks: Mutex::new(Vec::new()),
            config,
        })
    }

    /// Build, connect and register every configured provider, then start background tasks
    ///
    /// A provider that cannot be built or connected is skipped with a warning so
    /// that one bad entry does not take the whole gateway down.
    pub async fn from_config(config: GatewayConfig) -> Result<Arc<Self>> {
        config.validate().map_err(GatewayError::config)?;
        let manager = Arc::new(Self::new(config)?);

        for provider_config in manager.config.providers.clone() {
            let id = provider_config.id();
            let provider = match create_provider(provider_config) {
                Ok(provider) => provider,
                Err(e) => {
                    warn!(provider = %id, error = %e, "Skipping provider that could not be built");
                    continue;
                }
            };
            if let Err(e) = manager.register_provider(provider).await {
                warn!(provider = %id, error = %e, "Skipping provider that failed to register");
            }
        }

        if manager.registry.read().is_empty() {
            warn!("Provider manager started without any provider");
        }
        manager.start_background_tasks();
        Ok(manager)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Validate, connect and start routing to a provider
    ///
    /// Registering an id that is already known replaces the provider, resets its
    /// rate limiter and its load balancer metrics.
    pub async fn register_provider(&self, provider: Arc<dyn RpcProvider>) -> Result<()> {
        let provider_config = provider.config().clone();
        provider_config.validate().map_err(GatewayError::validation)?;
        provider.connect().await?;

        let id = provider.id().to_string();
        if let Some((_, previous)) = self.limiters.remove(&id) {
            previous.reset();
        }
        if let Some(rate_limit) = &provider_config.rate_limit {
            self.limiters
                .insert(id.clone(), Arc::new(RateLimiter::from_config(rate_limit)?));
        }

        let previous = self.registry.write().register(Arc::clone(&provider));
        self.balancer.add_provider(&id, &provider_config);

        if let Some(previous) = previous {
            if !Arc::ptr_eq(&previous, &provider) {
                if let Err(e) = previous.disconnect().await {
                    warn!(provider = %id, error = %e, "Failed to disconnect replaced provider");
                }
            }
            info!(provider = %id, "Provider re-registered");
        } else {
            info!(
                provider = %id,
                provider_type = %provider_config.provider_type,
                chain_id = provider_config.chain_id,
                "Provider registered"
            );
        }
        Ok(())
    }

    /// Disconnect a provider and forget every piece of state kept for it
    pub async fn remove_provider(&self, id: &str) -> Result<bool> {
        let removed = self.registry.write().remove(id);
        let Some(provider) = removed else {
            return Ok(false);
        };

        self.balancer.remove_provider(id);
        if let Some((_, limiter)) = self.limiters.remove(id) {
            limiter.shutdown();
        }
        provider.disconnect().await?;
        info!(provider = id, "Provider removed");
        Ok(true)
    }

    pub fn provider(&self, id: &str) -> Option<Arc<dyn RpcProvider>> {
        self.registry.read().get(id)
    }

    /// Registered provider ids in registration order
    pub fn provider_ids(&self) -> Vec<String> {
        self.registry.read().list()
    }

    pub fn load_balancer(&self) -> &LoadBalancer {
        &self.balancer
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Adapter-side statistics per provider
    pub fn stats(&self) -> HashMap<String, ProviderStats> {
        self.registry
            .read()
            .all()
            .into_iter()
            .map(|provider| (provider.id().to_string(), provider.stats()))
            .collect()
    }

    /// Load balancer metrics per provider
    pub fn metrics(&self) -> HashMap<String, ProviderMetrics> {
        self.balancer.metrics()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn rate_limit_status(&self) -> HashMap<String, RateLimitStatus> {
        self.limiters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().status()))
            .collect()
    }

    fn limiter(&self, id: &str) -> Option<Arc<RateLimiter>> {
        self.limiters.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Take a token for `id`; providers without a limiter always pass
    fn admit(&self, id: &str) -> bool {
        self.limiter(id).is_none_or(|limiter| limiter.try_consume())
    }

    /// Stop background work, disconnect providers and drop all state
    pub async fn destroy(&self) {
        self.stop_background_tasks();

        let providers = {
            let mut registry = self.registry.write();
            let providers = registry.all();
            registry.clear();
            providers
        };
        for provider in providers {
            if let Err(e) = provider.disconnect().await {
                warn!(provider = %provider.id(), error = %e, "Failed to disconnect provider");
            }
        }

        for entry in self.limiters.iter() {
            entry.value().shutdown();
        }
        self.limiters.clear();
        self.cache.clear();
        self.balancer.clear();
        info!("Provider manager destroyed");
    }
}

impl std::fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderManager")
            .field("providers", &self.provider_ids())
            .field("strategy", &self.balancer.strategy())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Drop for ProviderManager {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}
