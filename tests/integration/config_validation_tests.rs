//! Configuration loading and validation integration tests
//!
//! Exercise the path from a YAML document (inline or on disk) through
//! environment overrides to a validated gateway configuration.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::SAMPLE_YAML;
    use crate::common::{GatewayConfigFactory, ProviderConfigFactory};
    use rpc_gateway::config::Validate;
    use rpc_gateway::{
        CacheConfig, Config, GatewayError, HealthCheckConfig, LoadBalancingStrategy,
        ProviderConfig, ProviderType, RateLimitConfig, RetryConfig,
    };
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn config_error(result: Result<Config, GatewayError>) -> String {
        match result {
            Err(GatewayError::Config(message)) => message,
            other => panic!("Expected a configuration error, got {:?}", other),
        }
    }

    // ==================== Loading ====================

    /// Every section of a full document is honoured
    #[test]
    fn test_sample_document() {
        let config = Config::from_yaml_str(SAMPLE_YAML, env(&[("INFURA_API_KEY", "infura-key")]))
            .unwrap();
        let gateway = &config.gateway;

        assert_eq!(gateway.providers.len(), 3);
        assert_eq!(gateway.providers[0].id(), "alchemy_primary");
        assert_eq!(gateway.providers[0].weight, 3);
        assert_eq!(gateway.providers[0].rate_limit, Some(RateLimitConfig::new(25, 1000)));
        assert_eq!(gateway.providers[1].api_key, "infura-key");
        assert_eq!(gateway.providers[2].url.as_deref(), Some("http://10.0.0.5:8545"));
        assert_eq!(gateway.providers[2].timeout_ms, 5000);

        assert_eq!(gateway.router.strategy, LoadBalancingStrategy::Priority);
        assert_eq!(gateway.cache.short_ttl_secs, 2);
        assert_eq!(gateway.cache.max_entries, 500);
        assert_eq!(gateway.retry.max_retries, 4);
        assert_eq!(gateway.retry.retry_delay_ms, 250);
        assert_eq!(gateway.health_check.interval_secs, 15);
    }

    /// Omitted fields take their defaults
    #[test]
    fn test_defaults_fill_gaps() {
        let config = Config::from_yaml_str(
            "providers:\n  - name: node\n    type: custom\n    url: http://127.0.0.1:8545\n",
            |_| None,
        )
        .unwrap();
        let provider = &config.providers()[0];

        assert_eq!(provider.chain_id, 1);
        assert_eq!(provider.weight, 1);
        assert_eq!(provider.priority, 100);
        assert_eq!(provider.timeout_ms, 30_000);
        assert!(provider.rate_limit.is_none());
        assert_eq!(config.router().strategy, LoadBalancingStrategy::RoundRobin);
        assert_eq!(*config.cache(), CacheConfig::default());
        assert_eq!(config.gateway.retry, RetryConfig::default());
        assert_eq!(config.gateway.health_check, HealthCheckConfig::default());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let message = config_error(Config::from_yaml_str(SAMPLE_YAML, |_| None));
        assert!(message.contains("API key"), "{}", message);
        assert!(message.contains("INFURA_API_KEY"), "{}", message);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let yaml = "router:\n  strategy: fastest\n";
        assert!(matches!(
            Config::from_yaml_str(yaml, |_| None),
            Err(GatewayError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_provider_type_rejected() {
        let yaml = "providers:\n  - name: x\n    type: ankr\n";
        assert!(Config::from_yaml_str(yaml, |_| None).is_err());
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let config = Config::from_yaml_str(
            SAMPLE_YAML,
            env(&[
                ("INFURA_API_KEY", "infura-key"),
                ("GATEWAY_STRATEGY", "cost_optimized"),
                ("GATEWAY_MAX_RETRIES", "2"),
                ("GATEWAY_CACHE_ENABLED", "false"),
            ]),
        )
        .unwrap();

        assert_eq!(config.router().strategy, LoadBalancingStrategy::CostOptimized);
        assert_eq!(config.gateway.retry.max_retries, 2);
        assert!(!config.cache().enabled);
        // Explicit keys are never replaced
        assert_eq!(config.providers()[0].api_key, "alchemy-key");
    }

    #[test]
    fn test_env_override_cannot_bypass_validation() {
        let result = Config::from_yaml_str(
            SAMPLE_YAML,
            env(&[("INFURA_API_KEY", "k"), ("GATEWAY_MAX_RETRIES", "0")]),
        );
        let message = config_error(result);
        assert!(message.contains("retries"), "{}", message);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "providers:\n  - name: node\n    type: custom\n    url: http://127.0.0.1:8545\n    chain_id: 137"
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.providers()[0].id(), "custom_node");
        assert_eq!(config.providers()[0].chain_id, 137);
    }

    #[tokio::test]
    async fn test_malformed_file_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"providers: [ {name: node, type: custom\n").unwrap();

        let message = config_error(Config::from_file(file.path()).await);
        assert!(message.contains("parse"), "{}", message);
    }

    /// The shipped example stays loadable
    #[test]
    fn test_example_config_parses() {
        let content = include_str!("../../config/gateway.yaml.example");
        let config = Config::from_yaml_str(
            content,
            env(&[
                ("ALCHEMY_API_KEY", "a"),
                ("INFURA_API_KEY", "i"),
                ("ETHERSCAN_API_KEY", "e"),
            ]),
        )
        .unwrap();

        assert_eq!(config.providers().len(), 4);
        assert!(
            config
                .providers()
                .iter()
                .filter(|p| p.provider_type.requires_api_key())
                .all(|p| !p.api_key.is_empty())
        );
        assert_eq!(config.router().strategy, LoadBalancingStrategy::Priority);
    }

    #[test]
    fn test_yaml_roundtrip_preserves_config() {
        let config = Config::from_yaml_str(SAMPLE_YAML, env(&[("INFURA_API_KEY", "k")])).unwrap();
        let reparsed = Config::from_yaml_str(&config.to_yaml().unwrap(), |_| None).unwrap();
        assert_eq!(reparsed.gateway, config.gateway);
    }

    // ==================== Provider Validation ====================

    #[test]
    fn test_factory_configs_are_valid() {
        let configs = [
            ProviderConfigFactory::custom("node"),
            ProviderConfigFactory::managed("main", ProviderType::Alchemy),
            ProviderConfigFactory::managed("backup", ProviderType::Infura),
            ProviderConfigFactory::explorer("scan"),
            ProviderConfigFactory::rate_limited("limited", 10, 1000),
        ];
        for config in &configs {
            assert!(config.validate().is_ok(), "{} should be valid", config.id());
        }
        assert!(GatewayConfigFactory::create().validate().is_ok());
    }

    #[test]
    fn test_quicknode_requires_url() {
        let config = ProviderConfig::new("qn", ProviderType::Quicknode);
        let err = config.validate().unwrap_err();
        assert!(err.contains("requires a url"), "{}", err);

        let config = config.with_url("https://example.quiknode.pro/token/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = ProviderConfigFactory::node_at("node", "ws://127.0.0.1:8546")
            .validate()
            .unwrap_err();
        assert!(err.contains("http"), "{}", err);
    }

    #[test]
    fn test_zero_values_rejected() {
        let cases = [
            ProviderConfigFactory::custom("node").with_chain_id(0),
            ProviderConfigFactory::custom("node").with_timeout_ms(0),
            ProviderConfigFactory::custom("node").with_rate_limit(0, 1000),
            ProviderConfigFactory::custom("node").with_rate_limit(10, 0),
            ProviderConfig::new("", ProviderType::Custom).with_url("http://127.0.0.1:8545"),
        ];
        for config in &cases {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let config = ProviderConfigFactory::custom("node").with_cost_per_request(f64::NAN);
        assert!(config.validate().is_err());
        let config = ProviderConfigFactory::custom("node").with_cost_per_request(0.0);
        assert!(config.validate().is_ok());
    }

    // ==================== Gateway Validation ====================

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut config = GatewayConfigFactory::create();
        config.providers = vec![
            ProviderConfigFactory::custom("node"),
            ProviderConfigFactory::custom("node").with_priority(5),
        ];
        let err = config.validate().unwrap_err();
        assert!(err.contains("custom_node"), "{}", err);
    }

    /// The same name under two provider types yields two distinct ids
    #[test]
    fn test_same_name_different_types_allowed() {
        let mut config = GatewayConfigFactory::create();
        config.providers = vec![
            ProviderConfigFactory::custom("main"),
            ProviderConfigFactory::managed("main", ProviderType::Alchemy),
        ];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_health_check_rules() {
        let mut config = GatewayConfigFactory::create();
        // Interval is irrelevant while disabled
        config.health_check.interval_secs = 0;
        assert!(config.validate().is_ok());

        config.health_check.enabled = true;
        assert!(config.validate().is_err());

        config.health_check.interval_secs = 10;
        config.health_check.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_rules() {
        let mut config = GatewayConfigFactory::create();
        config.cache.max_memory_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = GatewayConfigFactory::create();
        config.cache.cleanup_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
