//! Tool-specific error types.

use thiserror::Error;

use crate::domains::figma::FigmaError;
use crate::domains::resources::ResourceError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A resource operation (search, watch, check) failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A direct upstream call failed.
    #[error(transparent)]
    Figma(#[from] FigmaError),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_keep_their_message() {
        let err: ToolError = FigmaError::access_denied("/files/abc").into();
        assert_eq!(
            err.to_string(),
            "Access to Figma resource denied: /files/abc"
        );

        let err: ToolError = ResourceError::not_watched("figma:///file/abc").into();
        assert!(err.to_string().contains("not being watched"));
    }
}
