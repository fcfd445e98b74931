//! Adapter-side request statistics

use crate::core::providers::unified_provider::ProviderError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use tokio::time::Instant;

/// Counters kept by every adapter
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Running mean over every tracked call
    pub average_response_time_ms: f64,
    pub last_response_time_ms: u64,
    pub last_error: Option<String>,
    pub last_request_at: Option<DateTime<Utc>>,
    pub is_healthy: bool,
}

impl Default for ProviderStats {
    fn default() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            average_response_time_ms: 0.0,
            last_response_time_ms: 0,
            last_error: None,
            last_request_at: None,
            is_healthy: true,
        }
    }
}

/// Records the outcome and latency of adapter calls
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: Mutex<ProviderStats>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut`, recording its latency and outcome
    pub async fn track<T, F>(&self, fut: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let started = Instant::now();
        let result = fut.await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => self.record(elapsed_ms, None),
            Err(error) => self.record(elapsed_ms, Some(error.to_string())),
        }
        result
    }

    /// Fold one call into the counters
    pub fn record(&self, elapsed_ms: u64, error: Option<String>) {
        let mut stats = self.stats.lock();
        stats.total_requests += 1;
        let n = stats.total_requests as f64;
        stats.average_response_time_ms =
            (stats.average_response_time_ms * (n - 1.0) + elapsed_ms as f64) / n;
        stats.last_response_time_ms = elapsed_ms;
        stats.last_request_at = Some(Utc::now());

        match error {
            None => stats.successful_requests += 1,
            Some(message) => {
                stats.failed_requests += 1;
                stats.last_error = Some(message);
            }
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.stats.lock().is_healthy = healthy;
    }

    /// Flag unhealthy and keep the reason
    pub fn mark_unhealthy(&self, reason: impl Into<String>) {
        let mut stats = self.stats.lock();
        stats.is_healthy = false;
        stats.last_error = Some(reason.into());
    }

    pub fn snapshot(&self) -> ProviderStats {
        self.stats.lock().clone()
    }

    pub fn reset(&self) {
        *self.stats.lock() = ProviderStats::default();
    }
}
