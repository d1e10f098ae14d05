//! Tool-specific error types.

use thiserror::Error;

use crate::core::client::UpstreamError;

/// Result type for tool handlers.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors a tool handler can produce.
///
/// Every variant ends up in an `isError: true` tool result; none of them is a
/// protocol-level error.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments could not be decoded or broke a field rule.
    #[error("{0}")]
    InvalidArguments(String),

    /// The upstream platform call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Upstream HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream(err) => err.status(),
            _ => None,
        }
    }

    /// Upstream response body, when the failure came from a response.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Upstream(err) => err.body(),
            _ => None,
        }
    }
}

/// Protocol-level failures raised while dispatching a tool call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Failures while assembling the tool registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two tool sets declared the same name.
    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),
}
