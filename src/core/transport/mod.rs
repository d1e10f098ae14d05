//! Transport layer for the MCP server.
//!
//! - **STDIO**: newline-delimited JSON-RPC on stdin/stdout (default)
//! - **SSE**: one event stream per client plus a POST endpoint for requests
//! - **HTTP**: one JSON-RPC request per POST
//!
//! Every transport delegates message processing to [`McpServer`] and stops
//! when the shared [`Shutdown`] fires.
//!
//! [`McpServer`]: crate::core::McpServer
//! [`Shutdown`]: crate::core::Shutdown

mod config;
mod error;
mod service;

pub mod connections;
pub mod http;
pub mod rpc;
pub mod sse;
pub mod stdio;

pub use config::{DEFAULT_PORT, HttpConfig, SseConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
