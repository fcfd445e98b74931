//! # rpc-gateway
//!
//! A multi-provider blockchain JSON-RPC gateway for wallet services.
//!
//! Calls are spread over several upstream providers (managed node services,
//! self-hosted nodes, block explorer APIs) with health-aware load balancing,
//! per-provider rate limiting, a TTL/LRU response cache and automatic
//! failover.
//!
//! ## Features
//!
//! - **Load balancing**: round-robin, weighted, least-connections,
//!   least-response-time, priority and cost-optimized selection
//! - **Circuit breaking**: providers failing more than half of their calls
//!   leave rotation until a health check brings them back
//! - **Rate limiting**: FIFO token buckets per provider
//! - **Response caching**: method-aware TTL tiers with LRU eviction
//! - **Failover**: bounded retries with exponential backoff, at-most-once
//!   for calls that send or sign transactions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rpc_gateway::{Config, ProviderManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let manager = ProviderManager::from_config(config.gateway).await?;
//!
//!     let block = manager.get_block_number().await?;
//!     println!("Latest block: {}", block);
//!
//!     manager.destroy().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use config::models::{
    CacheConfig, GatewayConfig, HealthCheckConfig, LoadBalancingStrategy, ProviderConfig,
    ProviderType, RateLimitConfig, RetryConfig, RouterConfig,
};
pub use core::cache_manager::{CacheStats, ResponseCache};
pub use core::manager::ProviderManager;
pub use core::providers::base::ProviderStats;
pub use core::providers::{
    ExplorerProvider, ManagedNodeProvider, ProviderError, ProviderRegistry, SelfHostedProvider,
    create_provider,
};
pub use core::rate_limiter::RateLimiter;
pub use core::router::{LoadBalancer, ProviderMetrics};
pub use core::traits::provider::RpcProvider;
pub use core::types::{CachePolicy, RpcCall, RpcError, RpcMethod};
pub use utils::error::{ErrorKind, GatewayError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build metadata recorded by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
