//! Failover configuration validators
//!
//! This module provides validation implementations for RetryConfig and
//! HealthCheckConfig.

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("Max retries must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthCheckConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.interval_secs == 0 {
            return Err("Health check interval must be greater than 0".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Health check timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
