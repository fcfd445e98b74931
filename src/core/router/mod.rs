//! Provider selection
//!
//! The [`LoadBalancer`] keeps one [`ProviderMetrics`] record per registered
//! provider and picks among the healthy ones with the configured strategy. It
//! also hosts the circuit breaker: a provider whose failure rate passes the
//! threshold leaves rotation until it is marked healthy again.

pub mod load_balancer;
pub mod metrics;
mod strategy;


pub use load_balancer::{FAILURE_RATE_THRESHOLD, LoadBalancer, MIN_REQUESTS_FOR_TRIP};
pub use metrics::ProviderMetrics;
