//! Health probing and background maintenance

use super::ProviderManager;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

impl ProviderManager {
    /// Probe every provider concurrently and update the load balancer
    ///
    /// Returns the probe outcome per provider id.
    pub async fn run_health_checks(&self) -> HashMap<String, bool> {
        let providers = self.registry.read().all();
        let timeout = self.config.health_check.timeout();

        let probes = providers.iter().map(|provider| async move {
            let healthy = tokio::time::timeout(timeout, provider.health_check())
                .await
                .unwrap_or(false);
            (provider.id().to_string(), healthy)
        });
        let outcomes: HashMap<String, bool> = join_all(probes).await.into_iter().collect();

        for (id, healthy) in &outcomes {
            if *healthy {
                self.balancer.mark_healthy(id);
            } else {
                self.balancer.mark_unhealthy(id);
            }
        }
        debug!(
            probed = outcomes.len(),
            healthy = outcomes.values().filter(|healthy| **healthy).count(),
            "Health check round finished"
        );
        outcomes
    }

    /// Spawn the periodic health loop and the cache sweep
    ///
    /// Calling this again while the tasks run has no effect.
    pub fn start_background_tasks(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }

        if self.config.health_check.enabled {
            tasks.push(spawn_health_loop(Arc::downgrade(self)));
        }
        if self.cache.is_enabled() {
            tasks.push(self.cache.start_cleanup_task());
        }
        info!(tasks = tasks.len(), "Background tasks started");
    }

    pub fn stop_background_tasks(&self) {
        let mut tasks = self.tasks.lock();
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

fn spawn_health_loop(manager: Weak<ProviderManager>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = match manager.upgrade() {
            Some(manager) => manager.config.health_check.interval(),
            None => return,
        };
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(manager) = manager.upgrade() else {
                debug!("Provider manager dropped, stopping health checks");
                break;
            };
            let outcomes = manager.run_health_checks().await;
            let unhealthy: Vec<&String> = outcomes
                .iter()
                .filter(|(_, healthy)| !**healthy)
                .map(|(id, _)| id)
                .collect();
            if !unhealthy.is_empty() {
                warn!(?unhealthy, "Providers failed their health check");
            }
        }
    })
}
