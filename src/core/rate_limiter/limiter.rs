//! Core rate limiter implementation

use super::types::{RateLimitStatus, TokenBucketState};
use crate::config::models::rate_limit::RateLimitConfig;
use crate::utils::error::{GatewayError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

/// Smallest pause of the refill task
const MIN_REFILL_DELAY: Duration = Duration::from_millis(1);

/// Token bucket rate limiter for a single provider
#[derive(Debug)]
pub struct RateLimiter {
    /// Bucket capacity
    max_tokens: f64,
    /// Tokens per second
    refill_rate: f64,
    /// Bucket state shared with the refill task
    pub(super) state: Arc<Mutex<TokenBucketState>>,
}

impl RateLimiter {
    /// Create a full bucket allowing `requests` per `window`
    pub fn new(requests: u32, window: Duration) -> Result<Self> {
        if requests == 0 {
            return Err(GatewayError::validation(
                "rate limit requests must be greater than zero",
            ));
        }
        if window.is_zero() {
            return Err(GatewayError::validation(
                "rate limit window must be greater than zero",
            ));
        }

        let max_tokens = requests as f64;
        let refill_rate = max_tokens / window.as_secs_f64();

        Ok(Self {
            max_tokens,
            refill_rate,
            state: Arc::new(Mutex::new(TokenBucketState::full(max_tokens))),
        })
    }

    /// Create a limiter from provider configuration
    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        Self::new(config.requests, config.window())
    }

    /// Whether a token is available right now
    pub fn can_make_request(&self) -> bool {
        let mut state = self.state.lock();
        state.refill(self.max_tokens, self.refill_rate);
        state.tokens >= 1.0
    }

    /// Atomically take a token if one is available and nobody is queued
    pub fn try_consume(&self) -> bool {
        let mut state = self.state.lock();
        state.refill(self.max_tokens, self.refill_rate);
        state.prune_waiters();
        if state.waiters.is_empty() && state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Take a token, waiting in FIFO order when the bucket is empty
    pub async fn consume_token(&self) -> Result<()> {
        let receiver = {
            let mut state = self.state.lock();
            state.refill(self.max_tokens, self.refill_rate);
            state.prune_waiters();

            if state.waiters.is_empty() && state.tokens >= 1.0 {
                state.tokens -= 1.0;
                return Ok(());
            }

            let (sender, receiver) = oneshot::channel();
            state.waiters.push_back(sender);
            if state.timer.is_none() {
                let delay = self.next_refill_delay(state.tokens);
                state.timer = Some(self.spawn_refill_task(delay));
            }
            debug!(queued = state.waiters.len(), "Rate limiter queued request");
            receiver
        };

        receiver
            .await
            .map_err(|_| GatewayError::rate_limit("rate limiter was reset while waiting"))
    }

    /// Refill the bucket and drop every waiter
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.cancel_timer();
        state.waiters.clear();
        state.tokens = self.max_tokens;
        state.last_refill = tokio::time::Instant::now();
    }

    /// Stop the refill task and drop every waiter
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.cancel_timer();
        state.waiters.clear();
    }

    /// Tokens available after a lazy refill
    pub fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock();
        state.refill(self.max_tokens, self.refill_rate);
        state.tokens
    }

    /// Current bucket snapshot
    pub fn status(&self) -> RateLimitStatus {
        let mut state = self.state.lock();
        state.refill(self.max_tokens, self.refill_rate);
        state.prune_waiters();
        RateLimitStatus {
            available_tokens: state.tokens,
            max_tokens: self.max_tokens,
            refill_rate: self.refill_rate,
            queued: state.waiters.len(),
        }
    }

    pub fn max_tokens(&self) -> f64 {
        self.max_tokens
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// Time until the bucket holds one whole token
    fn next_refill_delay(&self, tokens: f64) -> Duration {
        let missing = (1.0 - tokens).max(0.0);
        let delay = if missing == 0.0 {
            1.0 / self.refill_rate
        } else {
            missing / self.refill_rate
        };
        Duration::from_secs_f64(delay).max(MIN_REFILL_DELAY)
    }

    /// Drain the waiter queue as tokens become available
    fn spawn_refill_task(&self, first_delay: Duration) -> tokio::task::JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let max_tokens = self.max_tokens;
        let refill_rate = self.refill_rate;

        tokio::spawn(async move {
            let mut delay = first_delay;
            loop {
                tokio::time::sleep(delay).await;

                let mut guard = state.lock();
                guard.refill(max_tokens, refill_rate);

                while guard.tokens >= 1.0 {
                    let Some(waiter) = guard.waiters.pop_front() else {
                        break;
                    };
                    // A dropped receiver does not cost a token
                    if waiter.send(()).is_ok() {
                        guard.tokens -= 1.0;
                    }
                }

                guard.prune_waiters();
                if guard.waiters.is_empty() {
                    // Detach our own handle so the next waiter starts a fresh task
                    guard.timer = None;
                    break;
                }

                let missing = (1.0 - guard.tokens).max(0.0);
                delay = Duration::from_secs_f64(missing / refill_rate).max(MIN_REFILL_DELAY);
            }
        })
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.state.lock().cancel_timer();
    }
}
