//! Provider factory integration tests
//!
//! Verify that each provider configuration becomes the right adapter with the
//! right endpoint, and that the registry keeps adapters in registration order.

#[cfg(test)]
mod tests {
    use crate::common::{MockProvider, ProviderConfigFactory};
    use rpc_gateway::core::providers::managed::managed_endpoint;
    use rpc_gateway::{
        ExplorerProvider, ManagedNodeProvider, ProviderConfig, ProviderError, ProviderRegistry,
        ProviderType, SelfHostedProvider, create_provider,
    };
    use std::sync::Arc;

    // ==================== Endpoints ====================

    /// Test Alchemy endpoint derivation from the chain id
    #[test]
    fn test_alchemy_endpoint() {
        let provider = ManagedNodeProvider::new(
            ProviderConfig::new("main", ProviderType::Alchemy).with_api_key("abc123"),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "https://eth-mainnet.g.alchemy.com/v2/abc123");

        let polygon = ProviderConfig::new("main", ProviderType::Alchemy)
            .with_api_key("abc123")
            .with_chain_id(137);
        assert_eq!(
            managed_endpoint(&polygon).unwrap(),
            "https://polygon-mainnet.g.alchemy.com/v2/abc123"
        );
    }

    /// Test Infura endpoint derivation from the chain id
    #[test]
    fn test_infura_endpoint() {
        let sepolia = ProviderConfig::new("backup", ProviderType::Infura)
            .with_api_key("key")
            .with_chain_id(11155111);
        assert_eq!(
            managed_endpoint(&sepolia).unwrap(),
            "https://sepolia.infura.io/v3/key"
        );
    }

    /// An explicit url always wins over the derived one
    #[test]
    fn test_explicit_url_overrides() {
        let config = ProviderConfigFactory::managed("main", ProviderType::Infura)
            .with_url("https://infura.internal/v3/key");
        assert_eq!(managed_endpoint(&config).unwrap(), "https://infura.internal/v3/key");
    }

    #[test]
    fn test_unknown_chain_needs_url() {
        let config = ProviderConfigFactory::managed("main", ProviderType::Alchemy).with_chain_id(999_999);
        let err = managed_endpoint(&config).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration { .. }));
        assert!(err.to_string().contains("999999"));

        let quicknode = ProviderConfig::new("qn", ProviderType::Quicknode);
        assert!(managed_endpoint(&quicknode).is_err());
    }

    #[test]
    fn test_explorer_unknown_chain() {
        let config = ProviderConfigFactory::explorer("scan").with_chain_id(999_999);
        assert!(ExplorerProvider::new(config).is_err());

        let config = ProviderConfigFactory::explorer("scan")
            .with_chain_id(999_999)
            .with_url("https://explorer.internal/api");
        let provider = ExplorerProvider::new(config).unwrap();
        assert_eq!(provider.base_url(), "https://explorer.internal/api");
    }

    // ==================== Factory ====================

    /// Every provider type maps to an adapter reporting the configured identity
    #[test]
    fn test_factory_per_type() {
        let configs = [
            ProviderConfigFactory::managed("a", ProviderType::Alchemy),
            ProviderConfigFactory::managed("i", ProviderType::Infura),
            ProviderConfigFactory::managed("q", ProviderType::Quicknode)
                .with_url("https://example.quiknode.pro/token/"),
            ProviderConfigFactory::explorer("e"),
            ProviderConfigFactory::custom("c"),
        ];

        for config in configs {
            let expected_id = config.id();
            let expected_type = config.provider_type;
            let provider = create_provider(config).unwrap();
            assert_eq!(provider.id(), expected_id);
            assert_eq!(provider.provider_type(), expected_type);
            assert!(!provider.is_connected());
            // Only JSON-RPC nodes speak native batches
            assert_eq!(provider.supports_batch(), expected_type != ProviderType::Etherscan);
        }
    }

    /// Unset prices fall back to the published price of the provider type
    #[test]
    fn test_factory_fills_cost() {
        let provider = create_provider(ProviderConfigFactory::managed("a", ProviderType::Alchemy)).unwrap();
        assert_eq!(
            provider.config().cost_per_request,
            ProviderType::Alchemy.default_cost_per_request()
        );

        // Explorers stay unpriced unless configured
        let provider = create_provider(ProviderConfigFactory::explorer("e")).unwrap();
        assert_eq!(provider.config().cost_per_request, None);

        let provider = create_provider(ProviderConfigFactory::custom("c").with_cost_per_request(0.5)).unwrap();
        assert_eq!(provider.config().cost_per_request, Some(0.5));
    }

    #[test]
    fn test_adapters_reject_foreign_types() {
        assert!(ManagedNodeProvider::new(ProviderConfigFactory::custom("c")).is_err());
        assert!(SelfHostedProvider::new(ProviderConfigFactory::explorer("e")).is_err());
        assert!(ExplorerProvider::new(ProviderConfigFactory::managed("a", ProviderType::Alchemy)).is_err());
        assert!(create_provider(ProviderConfig::new("c", ProviderType::Custom)).is_err());
    }

    // ==================== Registry ====================

    #[test]
    fn test_registry_order_and_lookup() {
        let mut registry = ProviderRegistry::new();
        for name in ["c", "a", "b"] {
            assert!(registry.register(Arc::new(MockProvider::new(name))).is_none());
        }
        registry.register(create_provider(ProviderConfigFactory::explorer("scan")).unwrap());

        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.list(),
            vec!["custom_c", "custom_a", "custom_b", "etherscan_scan"]
        );
        assert_eq!(registry.get_by_type(ProviderType::Custom).len(), 3);
        assert_eq!(registry.get_by_type(ProviderType::Etherscan).len(), 1);
        assert!(registry.get("custom_a").is_some());
        assert!(registry.get("alchemy_a").is_none());
    }

    #[test]
    fn test_registry_replace_keeps_position() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MockProvider::new("a")));
        registry.register(Arc::new(MockProvider::new("b")));

        let previous = registry.register(Arc::new(MockProvider::new("a")));
        assert!(previous.is_some());
        assert_eq!(registry.list(), vec!["custom_a", "custom_b"]);

        assert!(registry.remove("custom_a").is_some());
        assert!(!registry.contains("custom_a"));
        registry.clear();
        assert!(registry.is_empty());
    }
}
