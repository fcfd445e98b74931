//! Cache manager implementation
//!
//! This module contains the ResponseCache, an in-memory LRU cache of upstream
//! results with per-method TTL tiers and a byte budget.

use super::types::{AtomicCacheStats, CacheEntry, CacheKey, CacheStats, CacheWrite, RejectReason};
use crate::config::models::cache::CacheConfig;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct CacheState {
    entries: LruCache<CacheKey, CacheEntry<Value>>,
    size_bytes: usize,
}

impl CacheState {
    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry<Value>> {
        let entry = self.entries.pop(key)?;
        self.size_bytes = self.size_bytes.saturating_sub(entry.size_bytes);
        Some(entry)
    }

    fn evict_lru(&mut self) -> Option<(CacheKey, CacheEntry<Value>)> {
        let (key, entry) = self.entries.pop_lru()?;
        self.size_bytes = self.size_bytes.saturating_sub(entry.size_bytes);
        Some((key, entry))
    }
}

/// In-memory response cache
pub struct ResponseCache {
    /// Cache configuration
    config: CacheConfig,
    /// Entries in LRU order plus their byte total
    state: Mutex<CacheState>,
    /// Cache statistics (lock-free atomics for hot path)
    stats: AtomicCacheStats,
}

impl ResponseCache {
    /// Create a new cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            // Entry count is enforced on insert alongside the byte budget
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                size_bytes: 0,
            }),
            stats: AtomicCacheStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get a live value, dropping it if it outlived its ttl
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        if !self.config.enabled {
            return None;
        }

        let mut state = self.state.lock();
        let expired = match state.entries.get_mut(key) {
            Some(entry) => {
                if !entry.is_expired() {
                    entry.mark_accessed();
                    self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, hits = entry.hit_count, "Cache hit");
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            state.remove(key);
            self.stats.expirations.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache entry expired");
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value under its method's ttl unless `ttl_override` is given
    pub fn set(&self, key: CacheKey, value: Value, ttl_override: Option<Duration>) -> CacheWrite {
        if !self.config.enabled {
            return self.reject(&key, RejectReason::Disabled);
        }

        let Some(policy_ttl) = self.config.ttl_for(key.policy()) else {
            return self.reject(&key, RejectReason::NeverCache);
        };
        if value.is_null() {
            return self.reject(&key, RejectReason::NullValue);
        }

        let size_bytes = Self::estimate_size(&value);
        let budget = self.config.max_memory_bytes;
        if size_bytes > budget {
            return self.reject(&key, RejectReason::TooLarge { size_bytes, budget });
        }

        let ttl = ttl_override.unwrap_or(policy_ttl);
        let mut state = self.state.lock();
        state.remove(&key);

        let mut evicted = 0u64;
        while !state.entries.is_empty()
            && (state.entries.len() >= self.config.max_entries
                || state.size_bytes + size_bytes > budget)
        {
            if state.evict_lru().is_none() {
                break;
            }
            evicted += 1;
        }
        if evicted > 0 {
            self.stats.evictions.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted, "Evicted least recently used cache entries");
        }

        debug!(key = %key, ttl_secs = ttl.as_secs(), size_bytes, "Cached response");
        state
            .entries
            .put(key, CacheEntry::new(value, ttl, size_bytes));
        state.size_bytes += size_bytes;

        CacheWrite::Stored
    }

    fn reject(&self, key: &CacheKey, reason: RejectReason) -> CacheWrite {
        self.stats.rejections.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, reason = %reason, "Cache write rejected");
        CacheWrite::Rejected(reason)
    }

    /// Estimate the size of a value in bytes
    fn estimate_size(value: &Value) -> usize {
        // Two bytes per serialized character
        serde_json::to_string(value)
            .map(|s| s.len() * 2)
            .unwrap_or(1024)
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn cleanup(&self) -> usize {
        let mut state = self.state.lock();
        let expired: Vec<CacheKey> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let mut freed = 0usize;
        for key in &expired {
            if let Some(entry) = state.remove(key) {
                freed += entry.size_bytes;
            }
        }

        if !expired.is_empty() {
            self.stats
                .expirations
                .fetch_add(expired.len() as u64, Ordering::Relaxed);
            info!(
                "Cleaned up {} expired cache entries, freed {} bytes",
                expired.len(),
                freed
            );
        }
        expired.len()
    }

    /// Number of stored entries, expired ones included until swept
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estimated bytes held
    pub fn size_bytes(&self) -> usize {
        self.state.lock().size_bytes
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        self.stats.snapshot(state.entries.len(), state.size_bytes)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.entries.clear();
            state.size_bytes = 0;
        }
        self.stats.reset();
        info!("Response cache cleared");
    }

    /// Sweep expired entries periodically while the cache is alive
    pub fn start_cleanup_task(self: &Arc<Self>) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = self.config.cleanup_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                match cache.upgrade() {
                    Some(cache) => {
                        cache.cleanup();
                    }
                    None => break,
                }
            }
        })
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .finish()
    }
}
