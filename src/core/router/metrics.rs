//! Per-provider routing metrics

use crate::config::models::provider::ProviderConfig;
use serde::Serialize;
use std::time::Duration;

/// Load balancer view of one registered provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderMetrics {
    /// Calls selected but not yet settled
    pub active_connections: u64,
    /// Settled calls, successes and failures
    pub total_requests: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Running mean over successful calls that reported a latency
    pub average_response_time_ms: f64,
    pub last_response_time_ms: Option<f64>,
    pub is_healthy: bool,
    pub weight: u32,
    /// Lower is preferred
    pub priority: u32,
    pub cost_per_request: Option<f64>,
    #[serde(skip)]
    latency_samples: u64,
}

impl ProviderMetrics {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            active_connections: 0,
            total_requests: 0,
            success_count: 0,
            failure_count: 0,
            average_response_time_ms: 0.0,
            last_response_time_ms: None,
            is_healthy: true,
            weight: config.weight,
            priority: config.priority,
            cost_per_request: config.cost_per_request,
            latency_samples: 0,
        }
    }

    /// Fraction of settled calls that failed
    pub fn failure_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.failure_count as f64 / self.total_requests as f64
        }
    }

    pub(super) fn settle(&mut self) {
        self.active_connections = self.active_connections.saturating_sub(1);
        self.total_requests += 1;
    }

    pub(super) fn observe_latency(&mut self, latency: Duration) {
        let sample = latency.as_secs_f64() * 1000.0;
        self.latency_samples += 1;
        let n = self.latency_samples as f64;
        self.average_response_time_ms = (self.average_response_time_ms * (n - 1.0) + sample) / n;
        self.last_response_time_ms = Some(sample);
    }

    /// Zero the counters, keeping configuration and health
    pub(super) fn reset_counters(&mut self) {
        self.active_connections = 0;
        self.total_requests = 0;
        self.success_count = 0;
        self.failure_count = 0;
        self.average_response_time_ms = 0.0;
        self.last_response_time_ms = None;
        self.latency_samples = 0;
    }
}
