//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP, the default mode. Everything the
//! server logs goes to stderr so stdout carries protocol frames only.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::{McpServer, Shutdown};

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve until stdin closes or shutdown is requested.
    pub async fn run(server: McpServer, shutdown: Shutdown) -> TransportResult<()> {
        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        info!("Ready - communicating via stdin/stdout");

        tokio::select! {
            quit = service.waiting() => {
                let reason = quit.map_err(|e| TransportError::ServiceError(e.to_string()))?;
                info!("STDIO session ended: {:?}", reason);
                shutdown.trigger("stdin closed");
            }
            _ = shutdown.wait() => {
                info!("Closing STDIO session");
            }
        }

        info!("STDIO transport stopped");
        Ok(())
    }
}
