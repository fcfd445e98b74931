//! Module
//!
//! Contains base components shared by all providers

pub mod connection_pool;
pub mod stats;

pub use connection_pool::{ConnectionPool, PoolConfig};
pub use stats::{ProviderStats, StatsTracker};
