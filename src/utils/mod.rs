//! Utility modules for the gateway
//!
//! - **error**: crate error type and taxonomy
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use logging::{LogLevel, init_logging};
