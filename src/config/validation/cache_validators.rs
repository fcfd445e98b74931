//! Cache and rate limit configuration validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_ttl_secs == 0 || self.short_ttl_secs == 0 || self.long_ttl_secs == 0 {
            return Err("Cache TTLs must be greater than 0".to_string());
        }

        if self.max_entries == 0 {
            return Err("Cache max entries must be greater than 0".to_string());
        }

        if self.max_memory_bytes == 0 {
            return Err("Cache memory budget must be greater than 0".to_string());
        }

        if self.cleanup_interval_secs == 0 {
            return Err("Cache cleanup interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.requests == 0 {
            return Err("Rate limit requests must be greater than 0".to_string());
        }

        if self.window_ms == 0 {
            return Err("Rate limit window must be greater than 0".to_string());
        }

        Ok(())
    }
}
