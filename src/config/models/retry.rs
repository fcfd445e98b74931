//! Retry configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Failover retry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Upstream attempts per logical call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay, doubled after every failed attempt
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Delay after the failed attempt with index `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}
