//! Integration tests for rpc-gateway
//!
//! These tests verify the interaction between the provider manager, its
//! routing state and the provider adapters. Network traffic only ever goes to
//! local `wiremock` servers.

pub mod adapter_tests;
pub mod config_validation_tests;
pub mod provider_factory_tests;
