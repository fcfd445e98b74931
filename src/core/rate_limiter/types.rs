//! Rate limiter types and data structures

use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Snapshot of a token bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateLimitStatus {
    /// Tokens currently available
    pub available_tokens: f64,
    /// Bucket capacity
    pub max_tokens: f64,
    /// Tokens added per second
    pub refill_rate: f64,
    /// Callers waiting for a token
    pub queued: usize,
}

/// Mutable bucket state, guarded by the limiter's mutex
#[derive(Debug)]
pub(super) struct TokenBucketState {
    /// Tokens in `[0, max_tokens]`
    pub(super) tokens: f64,
    /// Last lazy refill
    pub(super) last_refill: Instant,
    /// FIFO queue of callers waiting for a token
    pub(super) waiters: VecDeque<oneshot::Sender<()>>,
    /// Deferred refill task draining the queue
    pub(super) timer: Option<JoinHandle<()>>,
}

impl TokenBucketState {
    pub(super) fn full(max_tokens: f64) -> Self {
        Self {
            tokens: max_tokens,
            last_refill: Instant::now(),
            waiters: VecDeque::new(),
            timer: None,
        }
    }

    /// Add tokens for the time elapsed since the last refill
    pub(super) fn refill(&mut self, max_tokens: f64, refill_rate: f64) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_rate).min(max_tokens);
        self.last_refill = now;
    }

    /// Forget waiters whose future was dropped
    pub(super) fn prune_waiters(&mut self) {
        self.waiters.retain(|waiter| !waiter.is_closed());
    }

    pub(super) fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}
