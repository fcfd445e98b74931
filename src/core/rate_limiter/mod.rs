//! Rate Limiting Implementation
//!
//! Token bucket limiter, one per rate-limited provider. Callers either take a
//! token atomically (`try_consume`) or wait their turn in FIFO order
//! (`consume_token`).

mod limiter;
mod types;


// Re-export public types
pub use limiter::RateLimiter;
pub use types::RateLimitStatus;
