//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod cache;
pub mod gateway;
pub mod health;
pub mod provider;
pub mod rate_limit;
pub mod retry;
pub mod router;

// Re-export all configuration types
pub use cache::*;
pub use gateway::*;
pub use health::*;
pub use provider::*;
pub use rate_limit::*;
pub use retry::*;
pub use router::*;

/// Default chain id (Ethereum mainnet)
pub fn default_chain_id() -> u64 {
    1
}

/// Default provider weight
pub fn default_weight() -> u32 {
    1
}

/// Default provider priority, lower is preferred
pub fn default_priority() -> u32 {
    100
}

/// Default provider timeout in milliseconds
pub fn default_timeout_ms() -> u64 {
    30_000
}

/// Default maximum attempts per logical call
pub fn default_max_retries() -> u32 {
    3
}

/// Default base delay between attempts in milliseconds
pub fn default_retry_delay_ms() -> u64 {
    1000
}

pub fn default_cache_ttl_secs() -> u64 {
    60
}

pub fn default_short_ttl_secs() -> u64 {
    5
}

pub fn default_long_ttl_secs() -> u64 {
    300
}

pub fn default_cache_max_entries() -> usize {
    1000
}

pub fn default_cache_max_memory_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

pub fn default_cleanup_interval_secs() -> u64 {
    60
}

pub fn default_health_check_interval_secs() -> u64 {
    30
}

pub fn default_health_check_timeout_ms() -> u64 {
    5_000
}

pub fn default_true() -> bool {
    true
}
