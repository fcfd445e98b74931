//! Load balancer for provider selection and per-provider bookkeeping

use super::metrics::ProviderMetrics;
use super::strategy::{self, ProviderEntry, WeightedTable};
use crate::config::models::provider::ProviderConfig;
use crate::config::models::router::LoadBalancingStrategy;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Failure rate above which a provider is taken out of rotation
pub const FAILURE_RATE_THRESHOLD: f64 = 0.5;
/// Settled calls required before the failure rate is trusted
pub const MIN_REQUESTS_FOR_TRIP: u64 = 10;

#[derive(Debug, Default)]
struct BalancerState {
    /// Registration order
    entries: Vec<ProviderEntry>,
    round_robin: usize,
    weighted: WeightedTable,
}

impl BalancerState {
    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn metrics_mut(&mut self, id: &str) -> Option<&mut ProviderMetrics> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.metrics)
    }

    fn healthy(&self) -> Vec<usize> {
        (0..self.entries.len())
            .filter(|&i| self.entries[i].metrics.is_healthy)
            .collect()
    }
}

/// Picks a provider for each call according to the configured strategy
#[derive(Debug)]
pub struct LoadBalancer {
    strategy: LoadBalancingStrategy,
    state: Mutex<BalancerState>,
}

impl LoadBalancer {
    pub fn new(strategy: LoadBalancingStrategy) -> Self {
        info!(strategy = %strategy, "Creating load balancer");
        Self {
            strategy,
            state: Mutex::new(BalancerState::default()),
        }
    }

    pub fn strategy(&self) -> LoadBalancingStrategy {
        self.strategy
    }

    /// Track a provider; re-adding an id keeps its position and starts fresh metrics
    pub fn add_provider(&self, id: &str, config: &ProviderConfig) {
        let mut state = self.state.lock();
        let metrics = ProviderMetrics::from_config(config);
        match state.position(id) {
            Some(position) => state.entries[position].metrics = metrics,
            None => state.entries.push(ProviderEntry {
                id: id.to_string(),
                metrics,
            }),
        }
        self.rebuild_weighted(&mut state);
        debug!(provider = id, weight = config.weight, "Provider added to load balancer");
    }

    pub fn remove_provider(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        let Some(position) = state.position(id) else {
            return false;
        };
        state.entries.remove(position);
        self.rebuild_weighted(&mut state);
        debug!(provider = id, "Provider removed from load balancer");
        true
    }

    /// Only the weighted strategy walks the slot table
    fn rebuild_weighted(&self, state: &mut BalancerState) {
        if self.strategy == LoadBalancingStrategy::WeightedRoundRobin {
            let BalancerState { entries, weighted, .. } = state;
            weighted.rebuild(entries);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Healthy provider ids in registration order
    pub fn healthy_providers(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .healthy()
            .into_iter()
            .map(|i| state.entries[i].id.clone())
            .collect()
    }

    /// Pick a healthy provider and count it as active
    pub fn select_provider(&self) -> Option<String> {
        self.select_provider_excluding(&HashSet::new())
    }

    /// Pick a healthy provider outside `excluded`
    ///
    /// When every healthy provider is excluded the full healthy set is used
    /// again, so a gateway with a single provider can still retry.
    pub fn select_provider_excluding(&self, excluded: &HashSet<String>) -> Option<String> {
        let mut state = self.state.lock();
        let healthy = state.healthy();
        if healthy.is_empty() {
            warn!("No healthy provider available");
            return None;
        }

        let fresh: Vec<usize> = healthy
            .iter()
            .copied()
            .filter(|&i| !excluded.contains(&state.entries[i].id))
            .collect();
        let candidates = if fresh.is_empty() { healthy } else { fresh };

        let BalancerState {
            entries,
            round_robin,
            weighted,
        } = &mut *state;
        let chosen = match self.strategy {
            LoadBalancingStrategy::RoundRobin => strategy::round_robin(&candidates, round_robin),
            LoadBalancingStrategy::WeightedRoundRobin => weighted
                .next(&candidates)
                .or_else(|| strategy::round_robin(&candidates, round_robin)),
            LoadBalancingStrategy::LeastConnections => {
                strategy::least_connections(entries, &candidates)
            }
            LoadBalancingStrategy::LeastResponseTime => {
                strategy::least_response_time(entries, &candidates)
            }
            LoadBalancingStrategy::Priority => strategy::priority(entries, &candidates),
            LoadBalancingStrategy::CostOptimized => strategy::cost_optimized(entries, &candidates),
        }?;

        let entry = &mut entries[chosen];
        entry.metrics.active_connections += 1;
        debug!(
            provider = %entry.id,
            strategy = %self.strategy,
            active = entry.metrics.active_connections,
            "Selected provider"
        );
        Some(entry.id.clone())
    }

    /// Count a provider chosen outside `select_provider` as active
    pub fn acquire(&self, id: &str) -> bool {
        match self.state.lock().metrics_mut(id) {
            Some(metrics) => {
                metrics.active_connections += 1;
                true
            }
            None => false,
        }
    }

    /// Drop an active connection without counting a request
    pub fn release(&self, id: &str) {
        if let Some(metrics) = self.state.lock().metrics_mut(id) {
            metrics.active_connections = metrics.active_connections.saturating_sub(1);
        }
    }

    pub fn record_success(&self, id: &str, latency: Option<Duration>) {
        if let Some(metrics) = self.state.lock().metrics_mut(id) {
            metrics.settle();
            metrics.success_count += 1;
            if let Some(latency) = latency {
                metrics.observe_latency(latency);
            }
        }
    }

    /// Count a failure and trip the circuit breaker when the failure rate is too high
    pub fn record_failure(&self, id: &str) {
        let mut state = self.state.lock();
        let Some(metrics) = state.metrics_mut(id) else {
            return;
        };
        metrics.settle();
        metrics.failure_count += 1;

        if metrics.is_healthy
            && metrics.total_requests > MIN_REQUESTS_FOR_TRIP
            && metrics.failure_rate() > FAILURE_RATE_THRESHOLD
        {
            metrics.is_healthy = false;
            warn!(
                provider = id,
                failures = metrics.failure_count,
                total = metrics.total_requests,
                "Circuit breaker tripped, provider marked unhealthy"
            );
        }
    }

    pub fn mark_healthy(&self, id: &str) {
        if let Some(metrics) = self.state.lock().metrics_mut(id) {
            if !metrics.is_healthy {
                info!(provider = id, "Provider marked healthy");
            }
            metrics.is_healthy = true;
        }
    }

    pub fn mark_unhealthy(&self, id: &str) {
        if let Some(metrics) = self.state.lock().metrics_mut(id) {
            if metrics.is_healthy {
                warn!(provider = id, "Provider marked unhealthy");
            }
            metrics.is_healthy = false;
        }
    }

    /// Unknown providers are reported unhealthy
    pub fn is_healthy(&self, id: &str) -> bool {
        let state = self.state.lock();
        state
            .position(id)
            .is_some_and(|i| state.entries[i].metrics.is_healthy)
    }

    pub fn provider_metrics(&self, id: &str) -> Option<ProviderMetrics> {
        let state = self.state.lock();
        state.position(id).map(|i| state.entries[i].metrics.clone())
    }

    pub fn metrics(&self) -> HashMap<String, ProviderMetrics> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|entry| (entry.id.clone(), entry.metrics.clone()))
            .collect()
    }

    pub fn reset_metrics(&self) {
        let mut state = self.state.lock();
        for entry in state.entries.iter_mut() {
            entry.metrics.reset_counters();
        }
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.round_robin = 0;
        state.weighted = WeightedTable::default();
    }

    #[cfg(test)]
    pub(super) fn weighted_slots(&self) -> usize {
        self.state.lock().weighted.len()
    }
}
