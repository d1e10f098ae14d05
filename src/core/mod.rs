//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the upstream API client, server lifecycle
//! and the transport layer.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod shutdown;
pub mod transport;

pub use cli::Cli;
pub use client::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use shutdown::Shutdown;
pub use transport::{TransportConfig, TransportService};
