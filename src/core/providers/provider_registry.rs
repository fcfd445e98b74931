//! Provider Registry
//!
//! Registration-ordered registry of live provider adapters, plus the factory
//! that turns a `ProviderConfig` into the matching adapter.

use super::explorer::ExplorerProvider;
use super::managed::ManagedNodeProvider;
use super::self_hosted::SelfHostedProvider;
use super::unified_provider::ProviderError;
use crate::config::models::provider::{ProviderConfig, ProviderType};
use crate::core::traits::provider::RpcProvider;
use std::collections::HashMap;
use std::sync::Arc;

/// Build the adapter for a provider configuration
pub fn create_provider(config: ProviderConfig) -> Result<Arc<dyn RpcProvider>, ProviderError> {
    let provider: Arc<dyn RpcProvider> = match config.provider_type {
        ProviderType::Alchemy | ProviderType::Infura | ProviderType::Quicknode => {
            Arc::new(ManagedNodeProvider::new(config)?)
        }
        ProviderType::Custom => Arc::new(SelfHostedProvider::new(config)?),
        ProviderType::Etherscan => Arc::new(ExplorerProvider::new(config)?),
    };
    Ok(provider)
}

/// Provider Registry keyed by provider id
#[derive(Default)]
pub struct ProviderRegistry {
    order: Vec<String>,
    providers: HashMap<String, Arc<dyn RpcProvider>>,
}

impl ProviderRegistry {
    /// Create new provider registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, returning the one it replaced
    ///
    /// A replacement keeps the original registration position.
    pub fn register(&mut self, provider: Arc<dyn RpcProvider>) -> Option<Arc<dyn RpcProvider>> {
        let id = provider.id().to_string();
        let previous = self.providers.insert(id.clone(), provider);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Get provider by id
    pub fn get(&self, id: &str) -> Option<Arc<dyn RpcProvider>> {
        self.providers.get(id).cloned()
    }

    /// Provider ids in registration order
    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Remove provider
    pub fn remove(&mut self, id: &str) -> Option<Arc<dyn RpcProvider>> {
        let removed = self.providers.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Check if provider is registered
    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Get provider count
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Clear all providers
    pub fn clear(&mut self) {
        self.order.clear();
        self.providers.clear();
    }

    /// All providers in registration order
    pub fn all(&self) -> Vec<Arc<dyn RpcProvider>> {
        self.order
            .iter()
            .filter_map(|id| self.providers.get(id).cloned())
            .collect()
    }

    /// Get providers by type
    pub fn get_by_type(&self, provider_type: ProviderType) -> Vec<Arc<dyn RpcProvider>> {
        self.all()
            .into_iter()
            .filter(|p| p.provider_type() == provider_type)
            .collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("provider_count", &self.providers.len())
            .field("providers", &self.order)
            .finish()
    }
}
