//! Transport configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    Stdio,

    /// Server-Sent Events streaming transport with a separate message endpoint.
    Sse(SseConfig),

    /// HTTP transport with JSON-RPC over POST.
    Http(HttpConfig),
}

/// SSE transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Interval between keep-alive frames, in seconds.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

/// Port used by the network transports when none is configured.
pub const DEFAULT_PORT: u16 = 3001;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_path() -> String {
    "/mcp".to_string()
}

fn default_cors() -> bool {
    true
}

fn default_keep_alive_secs() -> u64 {
    30
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Stdio
    }
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: default_host(),
            keep_alive_secs: default_keep_alive_secs(),
            enable_cors: default_cors(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl SseConfig {
    /// Keep-alive interval as a [`Duration`], never shorter than one second.
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }
}

impl TransportConfig {
    /// Load transport config from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = var("MCP_TRANSPORT").unwrap_or_default().to_lowercase();
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let host = var("MCP_HOST").unwrap_or_else(default_host);
        let enable_cors = var("MCP_HTTP_CORS")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        match transport.as_str() {
            "sse" => Self::Sse(SseConfig {
                port,
                host,
                keep_alive_secs: var("MCP_KEEP_ALIVE_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_keep_alive_secs),
                enable_cors,
            }),
            "http" => Self::Http(HttpConfig {
                port,
                host,
                rpc_path: var("MCP_HTTP_PATH").unwrap_or_else(default_rpc_path),
                enable_cors,
            }),
            _ => Self::Stdio,
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            Self::Sse(cfg) => format!(
                "SSE on {}:{} (keep-alive every {}s)",
                cfg.host, cfg.port, cfg.keep_alive_secs
            ),
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Self::Stdio)
    }
}
