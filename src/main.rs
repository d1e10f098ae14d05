//! MCP Server Entry Point
//!
//! Parses flags, loads configuration, initializes logging and serves the
//! selected transport until shutdown.
//!
//! Exit status is 1 when the server could not start and 0 otherwise.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use publishing_mcp_server::core::{Cli, Config, Error, McpServer, Shutdown, TransportService};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env_with_overrides(&cli.overrides());

    init_logging(&config.logging.level);

    match run(config).await {
        Ok(()) => {
            info!("Server shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            if failed_at_startup(&e) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

/// Whether `err` kept the server from starting (credentials, registry, bind).
fn failed_at_startup(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Error>()
        .is_none_or(Error::is_startup_failure)
}

async fn run(config: Config) -> Result<()> {
    info!("Starting {} v{}", config.server.name, config.server.version);

    let missing = config.upstream.missing_credentials();
    if !missing.is_empty() {
        warn!(
            "Missing credentials: {} (affected tools will fail until set)",
            missing.join(", ")
        );
    }

    let shutdown = Shutdown::new();
    shutdown.install_panic_hook();
    shutdown.listen_for_signals();

    let server = McpServer::new(config.clone()).context("Failed to initialize server")?;
    info!("Server initialized");

    TransportService::new(config.transport)
        .run(server, shutdown)
        .await
        .map_err(Error::from)
        .context("Transport failed")?;

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
