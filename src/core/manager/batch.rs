//! Batched calls

use super::ProviderManager;
use super::execution::{ConnectionGuard, with_timeout};
use crate::core::cache_manager::CacheKey;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::provider::RpcProvider;
use crate::core::types::{RpcCall, is_side_effecting};
use crate::utils::error::{GatewayError, Result};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

impl ProviderManager {
    /// Execute several calls, returning one result per call in input order
    ///
    /// Cached results are served first. Side-effecting calls always take the
    /// single-call path. The rest go out as one native batch when a healthy
    /// provider supports it; otherwise, or when the batch fails, each call is
    /// issued on its own, concurrently.
    pub async fn batch(&self, calls: &[RpcCall]) -> Vec<Result<Value>> {
        let mut results: Vec<Option<Result<Value>>> = calls.iter().map(|_| None).collect();
        let mut native: Vec<usize> = Vec::new();
        let mut individual: Vec<usize> = Vec::new();

        for (index, call) in calls.iter().enumerate() {
            if let Some(value) = self.cache.get(&CacheKey::from_call(call)) {
                results[index] = Some(Ok(value));
            } else if is_side_effecting(&call.method) {
                individual.push(index);
            } else {
                native.push(index);
            }
        }

        if !native.is_empty() {
            match self.native_batch(calls, &native).await {
                Some(outcomes) => {
                    for (index, outcome) in native.iter().copied().zip(outcomes) {
                        match outcome {
                            Some(result) => results[index] = Some(result),
                            None => individual.push(index),
                        }
                    }
                }
                None => individual.extend(native.iter().copied()),
            }
        }

        individual.sort_unstable();
        let singles = join_all(individual.iter().map(|&index| self.request(&calls[index]))).await;
        for (index, result) in individual.into_iter().zip(singles) {
            results[index] = Some(result);
        }

        results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|| Err(GatewayError::internal("batch entry left unanswered")))
            })
            .collect()
    }

    /// First healthy batch-capable provider, in registration order, that passes admission
    fn batch_provider(&self) -> Option<Arc<dyn RpcProvider>> {
        self.balancer
            .healthy_providers()
            .into_iter()
            .filter_map(|id| self.provider(&id))
            .filter(|provider| provider.supports_batch())
            .find(|provider| self.admit(provider.id()))
    }

    /// Send the calls at `indices` as one upstream batch
    ///
    /// `None` means the batch could not be sent or failed as a whole. A `None`
    /// entry means that call should be retried on its own.
    async fn native_batch(
        &self,
        calls: &[RpcCall],
        indices: &[usize],
    ) -> Option<Vec<Option<Result<Value>>>> {
        let provider = self.batch_provider()?;
        let id = provider.id().to_string();
        if !self.balancer.acquire(&id) {
            return None;
        }
        let guard = ConnectionGuard::new(&self.balancer, &id);

        let subset: Vec<RpcCall> = indices.iter().map(|&index| calls[index].clone()).collect();
        debug!(provider = %id, size = subset.len(), "Sending native batch");

        let started = Instant::now();
        let outcome = with_timeout(provider.as_ref(), provider.batch(&subset)).await;
        let latency = started.elapsed();

        let entries = match outcome {
            Ok(entries) if entries.len() == subset.len() => {
                guard.success(latency);
                entries
            }
            Ok(entries) => {
                guard.failure();
                warn!(
                    provider = %id,
                    expected = subset.len(),
                    received = entries.len(),
                    "Batch answered with the wrong number of entries, falling back"
                );
                return None;
            }
            Err(e) => {
                guard.failure();
                warn!(provider = %id, error = %e, "Native batch failed, falling back to single calls");
                return None;
            }
        };

        let outcomes = subset
            .into_iter()
            .zip(entries)
            .map(|(call, entry)| match entry {
                Ok(value) => {
                    self.cache.set(CacheKey::from_call(&call), value.clone(), None);
                    Some(Ok(value))
                }
                Err(error) if error.is_retryable_elsewhere() => None,
                Err(error) => Some(Err(GatewayError::RequestFailed {
                    method: call.method,
                    attempts: 1,
                    last_provider: Some(id.clone()),
                    source: ProviderError::upstream(&id, error),
                })),
            })
            .collect();
        Some(outcomes)
    }
}
