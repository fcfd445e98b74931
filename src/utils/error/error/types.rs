//! Error types for the Gateway

use crate::core::providers::unified_provider::ProviderError;
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// No provider could be selected for the call
    #[error("No healthy providers available for {method} (after {attempts} attempt(s))")]
    NoHealthyProvider { method: String, attempts: u32 },

    /// Terminal failure of a logical call after retries
    #[error(
        "Request {method} failed after {attempts} attempt(s), last provider {}: {source}",
        .last_provider.as_deref().unwrap_or("none")
    )]
    RequestFailed {
        method: String,
        attempts: u32,
        last_provider: Option<String>,
        #[source]
        source: ProviderError,
    },

    /// Provider errors outside of a request loop (connect, disconnect)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Rate limiter errors
    #[error("Rate limit error: {0}")]
    RateLimit(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error taxonomy exposed to wallet services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or timeout failure reaching a provider
    Transport,
    /// Local admission denied
    RateLimited,
    /// Provider answered with a structured error
    Upstream,
    /// Nothing healthy to route to
    NoHealthyProvider,
    /// Invalid configuration or input
    Configuration,
    /// Anything else
    Internal,
}
