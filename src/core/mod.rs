//! Core gateway components
//!
//! - `types` - JSON-RPC calls, errors and the method table
//! - `traits` - the provider contract
//! - `providers` - provider adapters and the registry
//! - `rate_limiter` - per-provider token buckets
//! - `cache_manager` - response cache
//! - `router` - load balancing and circuit breaking
//! - `manager` - the provider manager tying everything together

pub mod cache_manager;
pub mod manager;
pub mod providers;
pub mod rate_limiter;
pub mod router;
pub mod traits;
pub mod types;

pub use manager::ProviderManager;
