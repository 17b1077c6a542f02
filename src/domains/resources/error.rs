//! Resource-specific error types.

use thiserror::Error;

use super::uri::ResourceKind;
use crate::domains::figma::FigmaError;

/// JSON-RPC error codes surfaced for resource errors.
pub mod codes {
    pub const RESOURCE_NOT_FOUND: i32 = 100;
    pub const RESOURCE_ACCESS_DENIED: i32 = 101;
    pub const RESOURCE_TEMPORARILY_UNAVAILABLE: i32 = 102;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource URI does not match `figma:///kind/key[/id]`.
    #[error("Invalid Figma URI format: {0}")]
    InvalidUri(String),

    /// A component or variable URI without its sub-resource id.
    #[error("{kind:?} ID required: {uri}")]
    MissingResourceId { kind: ResourceKind, uri: String },

    /// `check` was called for a URI that was never watched.
    #[error("Resource not being watched: {0}")]
    NotWatched(String),

    /// Failure reported by the upstream client.
    #[error(transparent)]
    Upstream(#[from] FigmaError),
}

impl ResourceError {
    /// Create a new "invalid URI" error.
    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        Self::InvalidUri(uri.into())
    }

    /// Create a new "missing resource id" error.
    pub fn missing_resource_id(kind: ResourceKind, uri: impl Into<String>) -> Self {
        Self::MissingResourceId {
            kind,
            uri: uri.into(),
        }
    }

    /// Create a new "not watched" error.
    pub fn not_watched(uri: impl Into<String>) -> Self {
        Self::NotWatched(uri.into())
    }

    /// The JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidUri(_) | Self::MissingResourceId { .. } | Self::NotWatched(_) => {
                codes::INVALID_PARAMS
            }
            Self::Upstream(FigmaError::NotFound(_)) => codes::RESOURCE_NOT_FOUND,
            Self::Upstream(FigmaError::AccessDenied(_)) => codes::RESOURCE_ACCESS_DENIED,
            Self::Upstream(FigmaError::TemporarilyUnavailable(_)) => {
                codes::RESOURCE_TEMPORARILY_UNAVAILABLE
            }
            Self::Upstream(FigmaError::InvalidArgument(_)) => codes::INVALID_PARAMS,
            Self::Upstream(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Whether the caller may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(e) if e.is_retryable())
    }
}

impl From<ResourceError> for rmcp::ErrorData {
    fn from(err: ResourceError) -> Self {
        rmcp::ErrorData::new(
            rmcp::model::ErrorCode(err.code()),
            err.to_string(),
            None,
        )
    }
}
