use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::core::providers::unified_provider::ProviderError;

/// Unified connection pool configuration
pub struct PoolConfig;
impl PoolConfig {
    pub const POOL_SIZE: usize = 32;
    pub const KEEPALIVE_SECS: u64 = 90;
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Shared HTTP client for one provider
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    provider: Arc<str>,
    client: Arc<Client>,
    timeout: Duration,
}

impl ConnectionPool {
    /// Create a pool whose requests are bounded by `timeout`
    pub fn new(provider: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(PoolConfig::CONNECT_TIMEOUT_SECS).min(timeout))
            .pool_idle_timeout(Duration::from_secs(PoolConfig::KEEPALIVE_SECS))
            .pool_max_idle_per_host(PoolConfig::POOL_SIZE)
            .build()
            .map_err(|e| {
                ProviderError::configuration(provider, format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            provider: Arc::from(provider),
            client: Arc::new(client),
            timeout,
        })
    }

    /// Get the underlying reqwest client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON body and return the raw response body of a 2xx answer
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&self.provider, &e))?;

        self.read_body(response).await
    }

    /// GET with query parameters and return the raw response body of a 2xx answer
    pub async fn get_query(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&self.provider, &e))?;

        self.read_body(response).await
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            return Err(ProviderError::http_status(
                self.provider.as_ref(),
                status.as_u16(),
                format!("HTTP {}: {}", status, snippet),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(&self.provider, &e))?;
        Ok(body.to_vec())
    }
}
