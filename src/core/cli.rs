//! Command line interface.
//!
//! Flags override the matching environment variables; everything else is
//! configured through the environment.

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "publishing_mcp_server", version)]
#[command(about = "MCP server for BookStack, Ghost and Postiz", long_about = None)]
pub struct Cli {
    /// Serve over Server-Sent Events (GET /sse, POST /message) instead of stdio
    #[arg(long, conflicts_with = "http")]
    pub sse: bool,

    /// Serve JSON-RPC over HTTP POST instead of stdio
    #[arg(long)]
    pub http: bool,

    /// Port for the network transports (overrides PORT, default 3001)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides MCP_HOST, default 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,
}

impl Cli {
    /// Environment variables these flags stand in for.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if self.sse {
            overrides.push(("MCP_TRANSPORT", "sse".to_string()));
        } else if self.http {
            overrides.push(("MCP_TRANSPORT", "http".to_string()));
        }
        if let Some(port) = self.port {
            overrides.push(("PORT", port.to_string()));
        }
        if let Some(host) = &self.host {
            overrides.push(("MCP_HOST", host.clone()));
        }
        overrides
    }
}
