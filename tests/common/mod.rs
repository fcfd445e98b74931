//! Common test utilities for rpc-gateway
//!
//! - Scripted providers that never touch the network
//! - Configuration fixtures
//! - Custom assertions

pub mod fixtures;
pub mod providers;

pub use fixtures::{GatewayConfigFactory, ProviderConfigFactory};
pub use providers::{MockProvider, Reply};
