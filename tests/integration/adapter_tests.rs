//! HTTP adapter integration tests
//!
//! Run the JSON-RPC and explorer adapters against local `wiremock` servers.

#[cfg(test)]
mod tests {
    use crate::common::assertions::GatewayErrorAssertions;
    use crate::common::{GatewayConfigFactory, ProviderConfigFactory};
    use rpc_gateway::core::providers::JsonRpcClient;
    use rpc_gateway::{
        ErrorKind, LoadBalancingStrategy, ProviderError, ProviderManager, RpcCall, RpcError,
        RpcProvider, create_provider,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    // ==================== Helpers ====================

    fn rpc_result(id: u64, result: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": id, "result": result})
    }

    /// Answer a single call to `rpc_method` with `result`, echoing the request id
    async fn answer(server: &MockServer, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(EchoId(result))
            .mount(server)
            .await;
    }

    struct EchoId(Value);

    impl Respond for EchoId {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            let id = body.get("id").and_then(Value::as_u64).unwrap_or(0);
            ResponseTemplate::new(200).set_body_json(rpc_result(id, self.0.clone()))
        }
    }

    /// Answers every batch entry with its method name, in reverse order,
    /// optionally leaving one entry out
    struct ReversedBatch {
        drop_method: Option<&'static str>,
    }

    impl Respond for ReversedBatch {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let calls: Vec<Value> = serde_json::from_slice(&request.body).unwrap_or_default();
            let responses: Vec<Value> = calls
                .iter()
                .rev()
                .filter(|call| call["method"].as_str() != self.drop_method)
                .map(|call| rpc_result(call["id"].as_u64().unwrap_or(0), call["method"].clone()))
                .collect();
            ResponseTemplate::new(200).set_body_json(responses)
        }
    }

    async fn connected_node(server: &MockServer) -> Arc<dyn RpcProvider> {
        answer(server, "eth_chainId", json!("0x1")).await;
        let provider = create_provider(ProviderConfigFactory::node_at("node", &server.uri())).unwrap();
        provider.connect().await.unwrap();
        provider
    }

    // ==================== JSON-RPC Adapters ====================

    #[tokio::test]
    async fn test_self_hosted_request() {
        let server = MockServer::start().await;
        answer(&server, "eth_blockNumber", json!("0x10d4f")).await;
        let node = connected_node(&server).await;

        let value = node
            .request(&RpcCall::without_params("eth_blockNumber"))
            .await
            .unwrap();
        assert_eq!(value, json!("0x10d4f"));

        // Connect-time verification is not counted as traffic
        let stats = node.stats();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.successful_requests, 1);
    }

    #[tokio::test]
    async fn test_self_hosted_chain_mismatch() {
        let server = MockServer::start().await;
        answer(&server, "eth_chainId", json!("0x89")).await;
        let node = create_provider(ProviderConfigFactory::node_at("node", &server.uri())).unwrap();

        let err = node.connect().await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration { .. }));
        assert!(!node.is_connected());
    }

    #[tokio::test]
    async fn test_request_requires_connect() {
        let node = create_provider(ProviderConfigFactory::custom("node")).unwrap();
        let err = node
            .request(&RpcCall::without_params("eth_blockNumber"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConnected { .. }));
    }

    #[tokio::test]
    async fn test_upstream_error_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": 3, "message": "execution reverted", "data": "0x08c379a0"}
            })))
            .mount(&server)
            .await;
        let client =
            JsonRpcClient::new("custom_node", server.uri(), Duration::from_secs(5)).unwrap();

        let err = client
            .call(&RpcCall::new("eth_call", vec![json!({"to": "0x0"}), json!("latest")]))
            .await
            .unwrap_err();
        let rpc = err.rpc_error().unwrap();
        assert_eq!(rpc.code, 3);
        assert_eq!(rpc.data, Some(json!("0x08c379a0")));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
            .mount(&server)
            .await;
        let client =
            JsonRpcClient::new("custom_node", server.uri(), Duration::from_secs(5)).unwrap();

        let err = client
            .call(&RpcCall::without_params("eth_gasPrice"))
            .await
            .unwrap_err();
        match &err {
            ProviderError::Transport { status, .. } => assert_eq!(*status, Some(503)),
            other => panic!("Expected a transport error, got {:?}", other),
        }
        assert!(err.is_retryable());
        assert!(err.to_string().contains("upstream overloaded"));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let client =
            JsonRpcClient::new("custom_node", server.uri(), Duration::from_secs(5)).unwrap();

        let err = client
            .call(&RpcCall::without_params("eth_gasPrice"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(rpc_result(1, json!("0x1")))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        let client =
            JsonRpcClient::new("custom_node", server.uri(), Duration::from_millis(50)).unwrap();

        let err = client
            .call(&RpcCall::without_params("eth_blockNumber"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.may_have_reached_upstream());
    }

    /// Responses are matched back to calls by id, not by position
    #[tokio::test]
    async fn test_batch_reordered_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ReversedBatch { drop_method: None })
            .expect(1)
            .mount(&server)
            .await;
        let client =
            JsonRpcClient::new("custom_node", server.uri(), Duration::from_secs(5)).unwrap();
        let calls = [
            RpcCall::without_params("eth_blockNumber"),
            RpcCall::without_params("eth_gasPrice"),
            RpcCall::without_params("eth_chainId"),
        ];

        let results = client.batch(&calls).await.unwrap();
        let values: Vec<Value> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            values,
            vec![json!("eth_blockNumber"), json!("eth_gasPrice"), json!("eth_chainId")]
        );
    }

    #[tokio::test]
    async fn test_batch_missing_entry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ReversedBatch {
                drop_method: Some("eth_gasPrice"),
            })
            .mount(&server)
            .await;
        let client =
            JsonRpcClient::new("custom_node", server.uri(), Duration::from_secs(5)).unwrap();
        let calls = [
            RpcCall::without_params("eth_blockNumber"),
            RpcCall::without_params("eth_gasPrice"),
        ];

        let results = client.batch(&calls).await.unwrap();
        assert_eq!(results[0], Ok(json!("eth_blockNumber")));
        assert_eq!(
            results[1].as_ref().unwrap_err().code,
            RpcError::INTERNAL_ERROR
        );
    }

    #[tokio::test]
    async fn test_managed_provider_explicit_url() {
        let server = MockServer::start().await;
        answer(&server, "eth_gasPrice", json!("0x3b9aca00")).await;
        let config = ProviderConfigFactory::managed("main", rpc_gateway::ProviderType::Alchemy)
            .with_url(server.uri());
        let provider = create_provider(config).unwrap();
        provider.connect().await.unwrap();

        assert!(provider.supports_batch());
        let value = provider
            .request(&RpcCall::without_params("eth_gasPrice"))
            .await
            .unwrap();
        assert_eq!(value, json!("0x3b9aca00"));
    }

    // ==================== Explorer Adapter ====================

    async fn explorer(server: &MockServer) -> Arc<dyn RpcProvider> {
        let config = ProviderConfigFactory::explorer("scan").with_url(format!("{}/api", server.uri()));
        let provider = create_provider(config).unwrap();
        provider.connect().await.unwrap();
        provider
    }

    #[tokio::test]
    async fn test_explorer_proxy_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("module", "proxy"))
            .and(query_param("action", "eth_blockNumber"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(83, json!("0x10d4f"))))
            .expect(1)
            .mount(&server)
            .await;
        let provider = explorer(&server).await;

        let value = provider
            .request(&RpcCall::without_params("eth_blockNumber"))
            .await
            .unwrap();
        assert_eq!(value, json!("0x10d4f"));
    }

    #[tokio::test]
    async fn test_explorer_balance_is_hex() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("module", "account"))
            .and(query_param("action", "balance"))
            .and(query_param("address", "0xabc"))
            .and(query_param("tag", "latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": "1000000000000000000"
            })))
            .mount(&server)
            .await;
        let provider = explorer(&server).await;

        let value = provider
            .request(&RpcCall::new("eth_getBalance", vec![json!("0xabc"), json!("latest")]))
            .await
            .unwrap();
        assert_eq!(value, json!("0xde0b6b3a7640000"));
    }

    #[tokio::test]
    async fn test_explorer_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Invalid API Key"
            })))
            .mount(&server)
            .await;
        let provider = explorer(&server).await;

        let err = provider
            .request(&RpcCall::without_params("eth_gasPrice"))
            .await
            .unwrap_err();
        assert_eq!(err.rpc_error().map(|e| e.code), Some(-32000));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_explorer_rejects_unsupported_without_io() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let provider = explorer(&server).await;

        let err = provider
            .request(&RpcCall::new("eth_getLogs", vec![json!({"fromBlock": "0x1"})]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotSupported { .. }));
        // Retryable so the manager moves on to a full node
        assert!(err.is_retryable());
    }

    // ==================== End to End ====================

    /// A broken node is failed over and then flagged by the health check
    #[tokio::test]
    async fn test_manager_over_http_nodes() {
        let broken = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&broken)
            .await;
        let healthy = MockServer::start().await;
        answer(&healthy, "eth_chainId", json!("0x1")).await;
        answer(&healthy, "eth_blockNumber", json!("0x20")).await;

        let mut config = GatewayConfigFactory::with_strategy(LoadBalancingStrategy::Priority);
        config.providers = vec![
            ProviderConfigFactory::node_at("broken", &broken.uri()).with_priority(1),
            ProviderConfigFactory::node_at("healthy", &healthy.uri()).with_priority(2),
        ];
        let manager = ProviderManager::from_config(config).await.unwrap();

        assert_eq!(manager.get_block_number().await.unwrap(), 32);
        let metrics = manager.metrics();
        assert_eq!(metrics["custom_broken"].failure_count, 1);
        assert_eq!(metrics["custom_healthy"].success_count, 1);

        let outcomes = manager.run_health_checks().await;
        assert!(!outcomes["custom_broken"]);
        assert!(outcomes["custom_healthy"]);
        assert_eq!(
            manager.load_balancer().healthy_providers(),
            vec!["custom_healthy".to_string()]
        );

        manager.destroy().await;
        let err = manager.get_block_number().await.unwrap_err();
        err.assert_kind(ErrorKind::NoHealthyProvider);
    }
}
