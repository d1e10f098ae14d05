//! Publishing MCP Server Library
//!
//! Exposes operations on a BookStack wiki, a Ghost blog and a Postiz social
//! scheduler as Model Context Protocol tools.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the shared upstream client,
//!   the server handler, shutdown and the stdio/SSE/HTTP transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool definitions, the registry and the dispatcher
//!
//! # Example
//!
//! ```rust,no_run
//! use publishing_mcp_server::core::{Config, McpServer, Shutdown, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     let shutdown = Shutdown::new();
//!     shutdown.listen_for_signals();
//!     TransportService::new(config.transport).run(server, shutdown).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
