//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the immutable pieces every transport shares: the
//! configuration and the tool [`Dispatcher`] (which in turn holds the tool
//! registry and the upstream API client). It implements rmcp's
//! `ServerHandler` for the stdio transport; the HTTP and SSE transports call
//! the dispatcher directly.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument};

use super::client::ApiClient;
use super::config::Config;
use super::error::Result;
use crate::domains::tools::{DispatchError, Dispatcher, ToolRegistry};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool dispatcher shared by all sessions.
    dispatcher: Dispatcher,

    /// When the server was built; health endpoints report uptime from here.
    started_at: Instant,
}

impl McpServer {
    /// Build the server: upstream client, tool registry and dispatcher.
    ///
    /// Fails on unusable credentials or a tool registered twice.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let client = Arc::new(ApiClient::new(&config.upstream)?);
        let registry = Arc::new(ToolRegistry::with_builtin_tools()?);
        info!(tools = registry.len(), "Tool registry ready");

        Ok(Self {
            dispatcher: Dispatcher::new(registry, client),
            config,
            started_at: Instant::now(),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Time since the server was built.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Tool dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Tools as MCP model types.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .list_tools()
            .iter()
            .map(|definition| definition.to_tool())
            .collect()
    }

    /// Server identity reported during `initialize`.
    pub fn implementation(&self) -> Implementation {
        Implementation {
            name: self.name().to_string(),
            version: self.version().to_string(),
            ..Implementation::from_build_env()
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools for the BookStack wiki (books, bookshelves, chapters, pages), \
                 the Ghost blog (list_ghost_posts) and the Postiz scheduler (posts, integrations)."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: self.implementation(),
            ..Default::default()
        }
    }

    #[instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self
            .dispatcher
            .call_tool(request.name.as_ref(), request.arguments)
            .await
        {
            Ok(envelope) => Ok(envelope.into_call_tool_result()),
            Err(err @ DispatchError::UnknownTool(_)) => Err(McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                err.to_string(),
                None,
            )),
        }
    }
}
