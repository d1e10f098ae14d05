//! SSE transport implementation.
//!
//! Each `GET /sse` opens an independent MCP session. The client learns its
//! message URL from the `endpoint` event, POSTs JSON-RPC requests to
//! `/message?sessionId=<id>`, and receives responses on its stream as
//! `message` events.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
    routing::{get, post},
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::connections::{ConnectionRegistry, Frame};
use super::rpc;
use super::{TransportError, TransportResult, config::SseConfig};
use crate::core::{McpServer, Shutdown};

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
}

#[derive(Clone)]
struct SseState {
    server: McpServer,
    connections: Arc<ConnectionRegistry>,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

impl Frame {
    fn into_event(self) -> Event {
        match self {
            Frame::Connected => Event::default().comment("connected"),
            Frame::KeepAlive => Event::default().comment("ping"),
            Frame::Endpoint(path) => Event::default().event("endpoint").data(path),
            Frame::Message(json) => Event::default().event("message").data(json),
        }
    }
}

impl SseTransport {
    pub fn new(config: SseConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the router over an existing connection registry.
    pub fn router(&self, server: McpServer, connections: Arc<ConnectionRegistry>) -> Router {
        let state = SseState {
            server,
            connections,
        };

        let mut app = Router::new()
            .route("/sse", get(handle_connect))
            .route("/message", post(handle_message))
            .route("/health", get(health_check))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }
        app
    }

    /// Run until shutdown: stop the keep-alive timer, close every
    /// connection, stop accepting.
    pub async fn run(self, server: McpServer, shutdown: Shutdown) -> TransportResult<()> {
        let addr = self.address();
        let connections = Arc::new(ConnectionRegistry::new());
        let app = self.router(server, connections.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let keep_alive = spawn_keep_alive(
            connections.clone(),
            self.config.keep_alive_interval(),
            shutdown.child_token(),
        );

        info!("Ready - listening on {} (MCP over SSE)", addr);
        info!("  → Stream:   GET /sse");
        info!("  → Messages: POST /message?sessionId=<id>");
        info!("  → Health:   GET /health");

        let closing = connections.clone();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                // Open streams would otherwise hold graceful shutdown forever.
                closing.close_all();
            })
            .await;

        if let Err(e) = keep_alive.await {
            warn!("Keep-alive task ended abnormally: {}", e);
        }
        connections.close_all();
        info!("SSE transport stopped");

        served.map_err(|e| TransportError::http(e.to_string()))
    }
}

/// Push a keep-alive to every connection once per `interval` until cancelled.
pub fn spawn_keep_alive(
    connections: Arc<ConnectionRegistry>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let delivered = connections.broadcast_keep_alive();
                    debug!(delivered, "Keep-alive sent");
                }
            }
        }
        debug!("Keep-alive timer stopped");
    })
}

/// Open a new session stream.
async fn handle_connect(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.connections.open();
    info!(
        client_id = stream.client_id(),
        active = state.connections.active_count(),
        "SSE client connected"
    );
    Sse::new(stream.map(|frame| Ok(frame.into_event())))
}

/// Accept one JSON-RPC message for a session.
#[instrument(skip_all, fields(client_id = tracing::field::Empty))]
async fn handle_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let target = query
        .session_id
        .or_else(|| state.connections.most_recent())
        .filter(|client_id| state.connections.contains(client_id));

    let Some(client_id) = target else {
        warn!("Message for unknown or closed session");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "No active SSE connection for this session" })),
        )
            .into_response();
    };
    tracing::Span::current().record("client_id", client_id.as_str());

    let request = match rpc::decode(&body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };
    debug!(method = %request.method, "Accepted message");

    tokio::spawn(async move {
        let Some(response) = rpc::process_request(&state.server, request).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(payload) => {
                if !state
                    .connections
                    .deliver(&client_id, Frame::Message(payload))
                    .await
                {
                    debug!(client_id = %client_id, "Session closed, response discarded");
                }
            }
            Err(e) => warn!("Failed to encode response: {}", e),
        }
    });

    StatusCode::ACCEPTED.into_response()
}

/// Health check endpoint.
async fn health_check(State(state): State<SseState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "activeConnections": state.connections.active_count(),
        "uptime": state.server.uptime().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
