//! Cache configuration

use super::*;
use crate::core::types::CachePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Enable caching
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// TTL for methods without a specific policy
    #[serde(default = "default_cache_ttl_secs")]
    pub default_ttl_secs: u64,
    /// TTL for fast-changing chain state
    #[serde(default = "default_short_ttl_secs")]
    pub short_ttl_secs: u64,
    /// TTL for immutable or slow-changing data
    #[serde(default = "default_long_ttl_secs")]
    pub long_ttl_secs: u64,
    /// Maximum number of entries
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
    /// Byte budget over estimated entry sizes
    #[serde(default = "default_cache_max_memory_bytes")]
    pub max_memory_bytes: usize,
    /// Interval of the expiry sweep
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: default_cache_ttl_secs(),
            short_ttl_secs: default_short_ttl_secs(),
            long_ttl_secs: default_long_ttl_secs(),
            max_entries: default_cache_max_entries(),
            max_memory_bytes: default_cache_max_memory_bytes(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl CacheConfig {
    /// TTL for a policy tag, `None` for never-cache methods
    pub fn ttl_for(&self, policy: CachePolicy) -> Option<Duration> {
        let secs = match policy {
            CachePolicy::NeverCache => return None,
            CachePolicy::ShortTtl => self.short_ttl_secs,
            CachePolicy::LongTtl => self.long_ttl_secs,
            CachePolicy::Default => self.default_ttl_secs,
        };
        Some(Duration::from_secs(secs))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
