//! Error types and handling for the MCP server.
//!
//! This module defines the top-level error type: everything that can stop
//! the server from starting or keep it from serving.

use thiserror::Error;

use super::client::UpstreamError;
use super::transport::TransportError;
use crate::domains::tools::RegistryError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool registry could not be assembled.
    #[error("Tool registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The upstream API client could not be built.
    #[error("Upstream client error: {0}")]
    Upstream(#[from] UpstreamError),

    /// The transport failed to start or stopped abnormally.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Whether this error kept the server from starting.
    ///
    /// A transport that fails after it began serving is not a startup
    /// failure.
    pub fn is_startup_failure(&self) -> bool {
        match self {
            Self::Registry(_) | Self::Upstream(_) => true,
            Self::Transport(err) => err.is_startup_failure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_failures() {
        let duplicate = Error::from(RegistryError::DuplicateTool("login".to_string()));
        assert!(duplicate.is_startup_failure());

        let bad_key = Error::from(UpstreamError::auth("Ghost admin key id is empty"));
        assert!(bad_key.is_startup_failure());

        let bind = Error::from(TransportError::bind(
            "127.0.0.1:3001",
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        ));
        assert!(bind.is_startup_failure());
    }

    #[test]
    fn test_failure_while_serving_is_not_startup_failure() {
        let err = Error::from(TransportError::ServiceError("stdin reset".to_string()));
        assert!(!err.is_startup_failure());
        assert!(!Error::from(TransportError::http("connection reset")).is_startup_failure());
    }
}
