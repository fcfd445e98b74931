//! Rate limiting configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-provider token bucket configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window (bucket capacity)
    pub requests: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl RateLimitConfig {
    pub fn new(requests: u32, window_ms: u64) -> Self {
        Self {
            requests,
            window_ms,
        }
    }

    /// Window as a duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}
