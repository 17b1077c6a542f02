//! Figma API error types.

use thiserror::Error;

/// Errors returned by the Figma API client.
///
/// Messages never include the access token.
#[derive(Debug, Error)]
pub enum FigmaError {
    /// The upstream answered 404.
    #[error("Figma resource not found: {0}")]
    NotFound(String),

    /// The upstream answered 403.
    #[error("Access to Figma resource denied: {0}")]
    AccessDenied(String),

    /// Network-level failure (timeout, DNS, connection refused).
    /// This is the only kind a caller may retry.
    #[error("Figma API temporarily unavailable: {0}")]
    TemporarilyUnavailable(String),

    /// Any other non-2xx status.
    #[error("Figma API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// A request argument cannot be placed in an upstream path.
    #[error("Invalid request argument: {0}")]
    InvalidArgument(String),

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid response from Figma API: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl FigmaError {
    /// Create a new "not found" error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a new "access denied" error.
    pub fn access_denied(path: impl Into<String>) -> Self {
        Self::AccessDenied(path.into())
    }

    /// Create a new "temporarily unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::TemporarilyUnavailable(msg.into())
    }

    /// Create a new upstream status error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a new "invalid argument" error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new "invalid response" error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether a caller may retry the failed request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TemporarilyUnavailable(_))
    }

    /// Map a reqwest transport failure.
    ///
    /// reqwest includes the request URL in its messages, never headers, so
    /// the token cannot leak through here.
    pub(crate) fn from_transport(path: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::unavailable(format!("request to {path} timed out"))
        } else if err.is_connect() || err.is_request() {
            Self::unavailable(format!("request to {path} failed: {err}"))
        } else if err.is_decode() {
            Self::invalid_response(format!("{path}: {err}"))
        } else {
            Self::unavailable(format!("{path}: {err}"))
        }
    }
}
