//! Health check configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Periodic provider health probing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthCheckConfig {
    /// Run the periodic probe loop
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between probe rounds
    #[serde(default = "default_health_check_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound for a single probe
    #[serde(default = "default_health_check_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_health_check_interval_secs(),
            timeout_ms: default_health_check_timeout_ms(),
        }
    }
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
