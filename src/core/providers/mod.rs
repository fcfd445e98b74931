//! Upstream provider adapters
//!
//! - `json_rpc` - JSON-RPC 2.0 over HTTP, shared by node-style adapters
//! - `managed` - Alchemy, Infura and QuickNode
//! - `self_hosted` - an operator-run node at an explicit url
//! - `explorer` - Etherscan-family REST APIs

// Base infrastructure
pub mod base;

pub mod explorer;
pub mod json_rpc;
pub mod managed;
pub mod self_hosted;

// Registry and unified error
pub mod provider_registry;
pub mod unified_provider;

pub use explorer::ExplorerProvider;
pub use json_rpc::JsonRpcClient;
pub use managed::ManagedNodeProvider;
pub use provider_registry::{ProviderRegistry, create_provider};
pub use self_hosted::SelfHostedProvider;
pub use unified_provider::ProviderError;
