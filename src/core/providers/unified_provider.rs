//! Unified Provider Error Handling
//!
//! Single error type for every upstream adapter.
//!
//! | Variant | Purpose | Retryable elsewhere |
//! |------|------|--------|
//! | Transport | Network failure or non-2xx HTTP status | Yes |
//! | Timeout | Call exceeded the provider timeout | Yes |
//! | Upstream | Provider answered with a JSON-RPC error | Depends on code |
//! | RateLimited | Local admission denied | Yes |
//! | NotSupported | Adapter cannot serve the method | Yes |
//! | NotConnected | Adapter not connected | Yes |
//! | InvalidResponse | Body could not be decoded | Yes |
//! | Configuration | Adapter misconfigured | No |

use crate::core::types::RpcError;
use crate::utils::error::ErrorKind;

/// Unified provider error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Transport error for {provider}: {message}")]
    Transport {
        provider: String,
        message: String,
        /// HTTP status when the upstream answered with a non-2xx code
        status: Option<u16>,
        /// False when the request provably never left this process
        request_sent: bool,
    },

    #[error("Request to {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("Upstream error from {provider}: {error}")]
    Upstream { provider: String, error: RpcError },

    #[error("Rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    #[error("Method {method} is not supported by {provider}")]
    NotSupported { provider: String, method: String },

    #[error("Provider {provider} is not connected")]
    NotConnected { provider: String },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("Configuration error for {provider}: {message}")]
    Configuration { provider: String, message: String },
}

impl ProviderError {
    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
            status: None,
            request_sent: true,
        }
    }

    /// Transport failure that happened before the request was written
    pub fn connect(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
            status: None,
            request_sent: false,
        }
    }

    pub fn http_status(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
            status: Some(status),
            request_sent: true,
        }
    }

    pub fn timeout(provider: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            provider: provider.into(),
            timeout_ms,
        }
    }

    pub fn upstream(provider: impl Into<String>, error: RpcError) -> Self {
        Self::Upstream {
            provider: provider.into(),
            error,
        }
    }

    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    pub fn not_supported(provider: impl Into<String>, method: impl Into<String>) -> Self {
        Self::NotSupported {
            provider: provider.into(),
            method: method.into(),
        }
    }

    pub fn not_connected(provider: impl Into<String>) -> Self {
        Self::NotConnected {
            provider: provider.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Map a reqwest failure, keeping track of whether the body was sent
    pub fn from_reqwest(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport {
                provider: provider.to_string(),
                message: format!("request timed out: {}", err),
                status: None,
                request_sent: true,
            };
        }
        if err.is_connect() || err.is_builder() {
            return Self::connect(provider, err.to_string());
        }
        if err.is_decode() {
            return Self::invalid_response(provider, err.to_string());
        }
        match err.status() {
            Some(status) => Self::http_status(provider, status.as_u16(), err.to_string()),
            None => Self::transport(provider, err.to_string()),
        }
    }

    /// Provider the error originated from
    pub fn provider(&self) -> &str {
        match self {
            Self::Transport { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::RateLimited { provider }
            | Self::NotSupported { provider, .. }
            | Self::NotConnected { provider }
            | Self::InvalidResponse { provider, .. }
            | Self::Configuration { provider, .. } => provider,
        }
    }

    /// Whether another attempt, normally on a different provider, may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::NotSupported { .. }
            | Self::NotConnected { .. }
            | Self::InvalidResponse { .. } => true,
            Self::Upstream { error, .. } => error.is_retryable_elsewhere(),
            Self::Configuration { .. } => false,
        }
    }

    /// Whether the upstream may have received and acted on the call
    pub fn may_have_reached_upstream(&self) -> bool {
        match self {
            Self::Transport { request_sent, .. } => *request_sent,
            Self::Timeout { .. } | Self::Upstream { .. } | Self::InvalidResponse { .. } => true,
            Self::RateLimited { .. }
            | Self::NotSupported { .. }
            | Self::NotConnected { .. }
            | Self::Configuration { .. } => false,
        }
    }

    /// Structured upstream error, if any
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            Self::Upstream { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Taxonomy bucket
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::NotConnected { .. }
            | Self::InvalidResponse { .. } => ErrorKind::Transport,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Upstream { .. } | Self::NotSupported { .. } => ErrorKind::Upstream,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }
}
