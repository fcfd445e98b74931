//! Cache manager type definitions
//!
//! This module contains all the type definitions for the response cache,
//! including cache entries, keys, write outcomes and statistics.

use crate::core::types::{CachePolicy, RpcCall, cache_policy_for};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Cache entry with metadata
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the entry was written
    pub created_at: Instant,
    /// Lifetime of the entry
    pub ttl: Duration,
    /// Number of hits served
    pub hit_count: u64,
    /// Size in bytes (estimated)
    pub size_bytes: usize,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry
    pub fn new(value: T, ttl: Duration, size_bytes: usize) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
            hit_count: 0,
            size_bytes,
        }
    }

    /// An entry is live while `now - created_at <= ttl`
    pub fn is_expired(&self) -> bool {
        self.age() > self.ttl
    }

    /// Mark the entry as accessed
    pub fn mark_accessed(&mut self) {
        self.hit_count += 1;
    }

    /// Get the age of the entry
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }
}

/// Cache key, `method:params` with params in canonical JSON
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: String,
    params: String,
}

impl CacheKey {
    pub fn new(method: impl Into<String>, params_json: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: params_json.into(),
        }
    }

    /// Key for a call
    pub fn from_call(call: &RpcCall) -> Self {
        Self::new(call.method.clone(), call.params_json())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Policy of the method this key belongs to
    pub fn policy(&self) -> CachePolicy {
        cache_policy_for(&self.method)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.params)
    }
}

/// Why a write was not stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Caching is turned off
    Disabled,
    /// Method must never be cached
    NeverCache,
    /// `null` means "not yet known" and is not pinned
    NullValue,
    /// A single value exceeds the whole byte budget
    TooLarge { size_bytes: usize, budget: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Disabled => f.write_str("cache disabled"),
            RejectReason::NeverCache => f.write_str("method is never cached"),
            RejectReason::NullValue => f.write_str("null results are not cached"),
            RejectReason::TooLarge { size_bytes, budget } => {
                write!(f, "entry of {} bytes exceeds budget of {} bytes", size_bytes, budget)
            }
        }
    }
}

/// Outcome of a cache write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    Stored,
    Rejected(RejectReason),
}

impl CacheWrite {
    pub fn is_stored(&self) -> bool {
        matches!(self, CacheWrite::Stored)
    }
}

/// Atomic cache statistics for lock-free hot path updates
#[derive(Debug, Default)]
pub struct AtomicCacheStats {
    /// Cache hits
    pub hits: AtomicU64,
    /// Cache misses
    pub misses: AtomicU64,
    /// Entries evicted to make room
    pub evictions: AtomicU64,
    /// Entries dropped after their ttl
    pub expirations: AtomicU64,
    /// Writes that were not stored
    pub rejections: AtomicU64,
}

/// Cache statistics snapshot (returned to callers)
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub rejections: u64,
    /// Live entries
    pub entries: usize,
    /// Estimated bytes held
    pub size_bytes: usize,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl AtomicCacheStats {
    /// Create a snapshot of current counters
    pub fn snapshot(&self, entries: usize, size_bytes: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            entries,
            size_bytes,
        }
    }

    /// Reset all stats to zero
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
        self.rejections.store(0, Ordering::Relaxed);
    }
}
