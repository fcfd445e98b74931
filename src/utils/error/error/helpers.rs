//! Helper functions for creating and inspecting errors

use super::types::{ErrorKind, GatewayError};
use crate::core::types::RpcError;

impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn rate_limit<S: Into<String>>(message: S) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn no_healthy_provider<S: Into<String>>(method: S, attempts: u32) -> Self {
        Self::NoHealthyProvider {
            method: method.into(),
            attempts,
        }
    }

    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Yaml(_) => ErrorKind::Configuration,
            Self::NoHealthyProvider { .. } => ErrorKind::NoHealthyProvider,
            Self::RequestFailed { source, .. } => source.kind(),
            Self::Provider(source) => source.kind(),
            Self::RateLimit(_) => ErrorKind::RateLimited,
            Self::HttpClient(_) | Self::Io(_) => ErrorKind::Transport,
            Self::Serialization(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Structured upstream error carried by this failure, if any
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            Self::RequestFailed { source, .. } | Self::Provider(source) => source.rpc_error(),
            _ => None,
        }
    }

    /// Number of attempts made before the error surfaced
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::RequestFailed { attempts, .. } | Self::NoHealthyProvider { attempts, .. } => {
                Some(*attempts)
            }
            _ => None,
        }
    }
}
