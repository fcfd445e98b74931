//! Core RPC provider trait definitions
//!
//! Defines the unified interface for every upstream blockchain provider

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use tracing::warn;

use crate::config::models::provider::{ProviderConfig, ProviderType};
use crate::core::providers::base::{ProviderStats, StatsTracker};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{RpcCall, RpcError};

/// Per-call outcome of a native batch
pub type BatchResult = Vec<Result<Value, RpcError>>;

/// Unified RPC provider interface
///
/// Every upstream (managed node service, self-hosted node, block explorer)
/// implements this trait. The gateway only ever talks to providers through it.
///
/// # Design Principles
///
/// 1. **No internal retries**: an adapter makes exactly one upstream attempt per call,
///    failover belongs to the provider manager
/// 2. **Typed failures**: every error is a [`ProviderError`] the manager can classify
/// 3. **Observability**: every call is folded into the adapter's [`StatsTracker`]
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
///
/// #[async_trait]
/// impl RpcProvider for MyProvider {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     async fn request(&self, call: &RpcCall) -> Result<Value, ProviderError> {
///         self.tracker.track(self.client.call(call)).await
///     }
///
///     // implement other required methods...
/// }
/// ```
#[async_trait]
pub trait RpcProvider: Send + Sync + Debug + 'static {
    // ==================== Basic Metadata ====================

    /// Unique provider id, `{type}_{name}`
    fn id(&self) -> &str;

    /// Provider configuration
    ///
    /// Immutable once the provider is registered.
    fn config(&self) -> &ProviderConfig;

    /// Configured provider name
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Provider type
    fn provider_type(&self) -> ProviderType {
        self.config().provider_type
    }

    // ==================== Lifecycle ====================

    /// Prepare the provider for requests
    async fn connect(&self) -> Result<(), ProviderError>;

    /// Release resources; later requests fail with `NotConnected`
    async fn disconnect(&self) -> Result<(), ProviderError>;

    /// Whether `connect` succeeded and `disconnect` has not been called since
    fn is_connected(&self) -> bool;

    // ==================== Requests ====================

    /// Execute one call against the upstream
    ///
    /// # Errors
    /// * `NotConnected` before `connect`
    /// * `NotSupported` when the adapter cannot express the method
    /// * `Transport`, `Timeout`, `InvalidResponse` for delivery failures
    /// * `Upstream` when the provider answered with a JSON-RPC error
    async fn request(&self, call: &RpcCall) -> Result<Value, ProviderError>;

    /// Whether [`RpcProvider::batch`] sends a native batch
    fn supports_batch(&self) -> bool {
        false
    }

    /// Execute several calls in one upstream round trip
    ///
    /// Results are returned in input order. The outer error means the batch as
    /// a whole failed; per-call upstream errors live in the inner results.
    async fn batch(&self, calls: &[RpcCall]) -> Result<BatchResult, ProviderError> {
        let method = calls
            .first()
            .map(|call| call.method.clone())
            .unwrap_or_else(|| "batch".to_string());
        Err(ProviderError::not_supported(self.id(), method))
    }

    // ==================== Health and Stats ====================

    /// Probe the provider with `eth_blockNumber` bounded by its timeout
    ///
    /// A failed probe flags the adapter's stats unhealthy.
    async fn health_check(&self) -> bool {
        let call = RpcCall::without_params("eth_blockNumber");
        let timeout = self.config().timeout();

        match tokio::time::timeout(timeout, self.request(&call)).await {
            Ok(Ok(_)) => {
                self.tracker().set_healthy(true);
                true
            }
            Ok(Err(error)) => {
                warn!(provider = %self.id(), error = %error, "Health check failed");
                self.tracker().mark_unhealthy(error.to_string());
                false
            }
            Err(_) => {
                let error = ProviderError::timeout(self.id(), timeout.as_millis() as u64);
                warn!(provider = %self.id(), "Health check timed out");
                self.tracker().mark_unhealthy(error.to_string());
                false
            }
        }
    }

    /// Statistics recorder of this adapter
    fn tracker(&self) -> &StatsTracker;

    /// Snapshot of the adapter's statistics
    fn stats(&self) -> ProviderStats {
        self.tracker().snapshot()
    }
}
