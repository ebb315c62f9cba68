//! Observer server startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_observer`] which launches the Observer HTTP +
//! `WebSocket` server on a background Tokio task. The engine binary
//! calls this during startup so the Observer API runs concurrently with
//! the session loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerError, start_server};
use crate::state::AppState;

/// Errors that can occur when spawning the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the Observer HTTP server on a background Tokio task.
///
/// Returns a [`JoinHandle`] so the caller can manage the server's
/// lifecycle alongside the session loop. The server runs until the
/// Tokio runtime shuts down or the task is aborted.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is obviously
/// malformed. The actual bind happens on the background task; bind
/// failures there are logged rather than returned.
pub fn spawn_observer(
    host: String,
    port: u16,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    // Catch obvious misconfigurations before spawning the task.
    let addr_str = format!("{host}:{port}");
    let _: std::net::SocketAddr = addr_str.parse().map_err(|e| {
        StartupError::Server(ServerError::Bind(format!("invalid address {addr_str}: {e}")))
    })?;

    let handle = tokio::spawn(async move {
        if let Err(e) = start_server(&host, port, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(port, "Observer server spawned on background task");

    Ok(handle)
}
