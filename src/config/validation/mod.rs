//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Gateway and provider validators
//! - `router_validators`: Retry and health check validators
//! - `cache_validators`: Cache and rate limit validators
//! - `tests`: Test suite for all validators

mod cache_validators;
mod config_validators;
mod router_validators;
mod trait_def;

pub use trait_def::Validate;
