//! Process-wide shutdown coordination.
//!
//! A single [`Shutdown`] handle is cloned into every transport. Signals and
//! panics both trigger it; transports wait on it and wind down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Cloneable shutdown trigger.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
    initiated: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Returns `true` only for the first caller.
    pub fn trigger(&self, reason: &str) -> bool {
        if self.initiated.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!(reason, "Shutdown requested");
        self.token.cancel();
        true
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once shutdown has been requested.
    pub async fn wait(&self) {
        self.token.cancelled().await
    }

    /// Child token cancelled together with this handle.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Spawn a task translating SIGINT/SIGTERM into a shutdown request.
    pub fn listen_for_signals(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                reason = wait_for_signal() => {
                    shutdown.trigger(reason);
                }
                _ = shutdown.wait() => {}
            }
        });
    }

    /// Log panics and turn them into a graceful shutdown.
    ///
    /// The previous hook still runs, so the default panic message is kept.
    pub fn install_panic_hook(&self) {
        let shutdown = self.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            error!("Panic: {}", panic_info);
            previous(panic_info);
            shutdown.trigger("panic");
        }));
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {}", e);
            return ctrl_c().await;
        }
    };

    tokio::select! {
        reason = ctrl_c() => reason,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
