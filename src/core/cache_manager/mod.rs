//! Response cache
//!
//! In-memory LRU cache of upstream results keyed by `method:params`. Each
//! method belongs to a static TTL tier; send and sign methods are never cached.

pub mod manager;
pub mod types;


pub use manager::ResponseCache;
pub use types::{CacheEntry, CacheKey, CacheStats, CacheWrite, RejectReason};
