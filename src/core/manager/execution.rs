//! Single-call execution with failover

use super::ProviderManager;
use crate::core::cache_manager::CacheKey;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::router::LoadBalancer;
use crate::core::traits::provider::RpcProvider;
use crate::core::types::{RpcCall, is_side_effecting};
use crate::utils::error::{GatewayError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

/// Keeps a selected provider's active connection counted until it is settled
///
/// Dropping an unsettled guard, for example when the caller's future is
/// cancelled mid-flight, releases the connection without counting a request.
pub(super) struct ConnectionGuard<'a> {
    balancer: &'a LoadBalancer,
    provider_id: &'a str,
    settled: bool,
}

impl<'a> ConnectionGuard<'a> {
    pub(super) fn new(balancer: &'a LoadBalancer, provider_id: &'a str) -> Self {
        Self {
            balancer,
            provider_id,
            settled: false,
        }
    }

    pub(super) fn success(mut self, latency: Duration) {
        self.settled = true;
        self.balancer.record_success(self.provider_id, Some(latency));
    }

    pub(super) fn failure(mut self) {
        self.settled = true;
        self.balancer.record_failure(self.provider_id);
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.balancer.release(self.provider_id);
        }
    }
}

/// Run a provider future under the provider's timeout
pub(super) async fn with_timeout<T>(
    provider: &dyn RpcProvider,
    fut: impl Future<Output = std::result::Result<T, ProviderError>>,
) -> std::result::Result<T, ProviderError> {
    let timeout = provider.config().timeout();
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::timeout(provider.id(), timeout.as_millis() as u64)),
    }
}

impl ProviderManager {
    /// Execute one JSON-RPC call
    ///
    /// Served from the cache when possible. Otherwise up to `max_retries`
    /// attempts are made, each on a provider not yet tried for this call when
    /// one is available, with exponential backoff between failed attempts.
    pub async fn request(&self, call: &RpcCall) -> Result<Value> {
        let span = info_span!(
            "rpc_request",
            request_id = %Uuid::new_v4(),
            method = %call.method
        );
        self.execute(call).instrument(span).await
    }

    async fn execute(&self, call: &RpcCall) -> Result<Value> {
        let key = CacheKey::from_call(call);
        if let Some(value) = self.cache.get(&key) {
            debug!("Served from cache");
            return Ok(value);
        }

        let side_effecting = is_side_effecting(&call.method);
        let max_attempts = self.config.retry.max_retries;
        let mut tried: HashSet<String> = HashSet::new();
        let mut last_provider: Option<String> = None;
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=max_attempts {
            let Some(id) = self.balancer.select_provider_excluding(&tried) else {
                return Err(GatewayError::no_healthy_provider(&call.method, attempt - 1));
            };
            tried.insert(id.clone());
            last_provider = Some(id.clone());
            let guard = ConnectionGuard::new(&self.balancer, &id);

            let Some(provider) = self.provider(&id) else {
                // Removed between selection and lookup
                last_error = Some(ProviderError::not_connected(&id));
                continue;
            };

            if !self.admit(&id) {
                debug!(provider = %id, attempt, "Rate limited locally, trying next provider");
                last_error = Some(ProviderError::rate_limited(&id));
                continue;
            }

            let started = Instant::now();
            let result = with_timeout(provider.as_ref(), provider.request(call)).await;
            let latency = started.elapsed();

            let error = match result {
                Ok(value) => {
                    guard.success(latency);
                    self.cache.set(key, value.clone(), None);
                    debug!(
                        provider = %id,
                        attempt,
                        latency_ms = latency.as_millis() as u64,
                        "Request served"
                    );
                    return Ok(value);
                }
                Err(error) => error,
            };

            if let ProviderError::NotSupported { .. } = error {
                // Nothing was sent; the provider stays healthy
                debug!(provider = %id, attempt, "Method not supported, trying next provider");
                last_error = Some(error);
                continue;
            }

            if !error.is_retryable() {
                // The provider answered; the call itself is at fault
                if error.rpc_error().is_some() {
                    guard.success(latency);
                } else {
                    guard.failure();
                }
                return Err(request_failed(call, attempt, id, error));
            }

            guard.failure();
            if side_effecting && error.may_have_reached_upstream() {
                warn!(
                    provider = %id,
                    error = %error,
                    "Side-effecting call failed after reaching upstream, not retrying"
                );
                return Err(request_failed(call, attempt, id, error));
            }

            warn!(provider = %id, attempt, max_attempts, error = %error, "Provider attempt failed");
            last_error = Some(error);
            if attempt < max_attempts {
                tokio::time::sleep(self.config.retry.backoff(attempt - 1)).await;
            }
        }

        match last_error {
            Some(source) => Err(GatewayError::RequestFailed {
                method: call.method.clone(),
                attempts: max_attempts,
                last_provider,
                source,
            }),
            None => Err(GatewayError::no_healthy_provider(&call.method, 0)),
        }
    }
}

fn request_failed(
    call: &RpcCall,
    attempts: u32,
    provider: String,
    source: ProviderError,
) -> GatewayError {
    GatewayError::RequestFailed {
        method: call.method.clone(),
        attempts,
        last_provider: Some(provider),
        source,
    }
}
