//! Error handling for the Gateway
//!
//! This module defines the crate-level error type and its taxonomy.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{ErrorKind, GatewayError, Result};
