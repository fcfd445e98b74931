//! Router configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RouterConfig {
    /// Provider selection strategy
    #[serde(default)]
    pub strategy: LoadBalancingStrategy,
}

/// Provider selection strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalancingStrategy {
    /// Cycle through healthy providers
    #[default]
    RoundRobin,
    /// Cycle through a shuffled table holding `weight` slots per provider
    WeightedRoundRobin,
    /// Fewest in-flight calls
    LeastConnections,
    /// Lowest mean response time
    LeastResponseTime,
    /// Lowest priority value
    Priority,
    /// Cheapest provider
    CostOptimized,
}

impl LoadBalancingStrategy {
    pub const ALL: [LoadBalancingStrategy; 6] = [
        LoadBalancingStrategy::RoundRobin,
        LoadBalancingStrategy::WeightedRoundRobin,
        LoadBalancingStrategy::LeastConnections,
        LoadBalancingStrategy::LeastResponseTime,
        LoadBalancingStrategy::Priority,
        LoadBalancingStrategy::CostOptimized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadBalancingStrategy::RoundRobin => "round_robin",
            LoadBalancingStrategy::WeightedRoundRobin => "weighted_round_robin",
            LoadBalancingStrategy::LeastConnections => "least_connections",
            LoadBalancingStrategy::LeastResponseTime => "least_response_time",
            LoadBalancingStrategy::Priority => "priority",
            LoadBalancingStrategy::CostOptimized => "cost_optimized",
        }
    }
}

impl fmt::Display for LoadBalancingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadBalancingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        LoadBalancingStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| format!("Unknown load balancing strategy: {}", s))
    }
}
