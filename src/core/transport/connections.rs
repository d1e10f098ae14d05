//! Open SSE connections.
//!
//! The registry is the only owner of connection state. A connection is added
//! by [`ConnectionRegistry::open`] and removed when its [`ConnectionStream`]
//! is dropped, when a write finds the client gone, or on shutdown.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outbound frames buffered per connection.
const CHANNEL_CAPACITY: usize = 64;

/// One outbound SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `: connected` comment sent on open.
    Connected,
    /// `endpoint` event carrying the message URL for this session.
    Endpoint(String),
    /// `message` event carrying a JSON-RPC response.
    Message(String),
    /// `: ping` keep-alive comment.
    KeepAlive,
}

#[derive(Debug)]
struct Connection {
    serial: u64,
    established_at: DateTime<Utc>,
    sender: mpsc::Sender<Frame>,
}

/// Map of open connections keyed by client id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<String, Connection>>,
    next_serial: AtomicU64,
}

/// Generate `client_<unix-millis>_<8 lowercase hex>`.
pub fn generate_client_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("client_{}_{}", Utc::now().timestamp_millis(), &random[..8])
}

/// Message endpoint advertised to a client.
pub fn message_endpoint(client_id: &str) -> String {
    format!("/message?sessionId={}", client_id)
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and queue its greeting frames.
    pub fn open(self: &Arc<Self>) -> ConnectionStream {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);

        let client_id = {
            let mut connections = self.connections.lock();
            let mut client_id = generate_client_id();
            while connections.contains_key(&client_id) {
                client_id = generate_client_id();
            }
            connections.insert(
                client_id.clone(),
                Connection {
                    serial,
                    established_at: Utc::now(),
                    sender: sender.clone(),
                },
            );
            client_id
        };

        // A fresh channel always has room for the greeting.
        let _ = sender.try_send(Frame::Connected);
        let _ = sender.try_send(Frame::Endpoint(message_endpoint(&client_id)));

        ConnectionStream {
            inner: ReceiverStream::new(receiver),
            client_id,
            serial,
            registry: Arc::clone(self),
        }
    }

    /// Number of open connections.
    pub fn active_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Whether `client_id` is open.
    pub fn contains(&self, client_id: &str) -> bool {
        self.connections.lock().contains_key(client_id)
    }

    /// The most recently opened connection.
    pub fn most_recent(&self) -> Option<String> {
        self.connections
            .lock()
            .iter()
            .max_by_key(|(_, connection)| connection.serial)
            .map(|(client_id, _)| client_id.clone())
    }

    /// Push a frame to one client, waiting for buffer space.
    ///
    /// Returns `false` if the client is unknown or gone; a gone client is
    /// removed.
    pub async fn deliver(&self, client_id: &str, frame: Frame) -> bool {
        let Some((sender, serial)) = self
            .connections
            .lock()
            .get(client_id)
            .map(|connection| (connection.sender.clone(), connection.serial))
        else {
            return false;
        };

        if sender.send(frame).await.is_err() {
            debug!(client_id, "Client went away before delivery");
            self.remove(client_id, serial);
            return false;
        }
        true
    }

    /// Queue a keep-alive on every connection.
    ///
    /// A full buffer skips that client for this round. Returns the number of
    /// frames queued.
    pub fn broadcast_keep_alive(&self) -> usize {
        let connections = self.connections.lock();
        let mut delivered = 0;

        for (client_id, connection) in connections.iter() {
            match connection.sender.try_send(Frame::KeepAlive) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(client_id = %client_id, "Keep-alive skipped, client buffer full");
                }
                // Disconnects deregister in `ConnectionStream::drop` before
                // the receiver closes, so a registered sender is never closed.
                Err(TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Drop every connection, ending their streams. Returns how many were open.
    pub fn close_all(&self) -> usize {
        let closed: Vec<_> = self.connections.lock().drain().collect();
        if !closed.is_empty() {
            info!(count = closed.len(), "Closed all SSE connections");
        }
        closed.len()
    }

    /// Remove `client_id` only if it is still the registration `serial`.
    fn remove(&self, client_id: &str, serial: u64) -> Option<Connection> {
        let mut connections = self.connections.lock();
        if connections
            .get(client_id)
            .is_some_and(|connection| connection.serial == serial)
        {
            return connections.remove(client_id);
        }
        None
    }
}

/// Outbound frames of one connection.
///
/// Owns the registration: dropping the stream removes the connection.
pub struct ConnectionStream {
    inner: ReceiverStream<Frame>,
    client_id: String,
    serial: u64,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectionStream {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl Stream for ConnectionStream {
    type Item = Frame;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for ConnectionStream {
    fn drop(&mut self) {
        if let Some(connection) = self.registry.remove(&self.client_id, self.serial) {
            let connected_secs = (Utc::now() - connection.established_at).num_seconds();
            info!(
                client_id = %self.client_id,
                connected_secs,
                active = self.registry.active_count(),
                "SSE client disconnected"
            );
        }
    }
}
