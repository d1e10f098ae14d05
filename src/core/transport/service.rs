//! Transport service - starts the configured transport.

use tracing::info;

use super::http::HttpTransport;
use super::sse::SseTransport;
use super::stdio::StdioTransport;
use super::{TransportConfig, TransportResult};
use crate::core::{McpServer, Shutdown};

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Start the transport and serve until `shutdown` fires or the
    /// transport ends on its own.
    pub async fn run(self, server: McpServer, shutdown: Shutdown) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            TransportConfig::Stdio => StdioTransport::run(server, shutdown).await,
            TransportConfig::Sse(cfg) => SseTransport::new(cfg).run(server, shutdown).await,
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server, shutdown).await,
        }
    }
}
