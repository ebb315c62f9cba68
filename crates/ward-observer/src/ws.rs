//! `WebSocket` handler: push notifications out, commands in.
//!
//! Clients connect to `GET /ws`. On connect they immediately receive one
//! `state_update` built from the current snapshot (a new observer must
//! never start from a blank view), then a JSON-encoded
//! [`WardBroadcast`] for every subsequent state change.
//!
//! Inbound text frames are parsed as [`Command`]s and forwarded to the
//! engine's command channel. Malformed frames -- unknown command type,
//! missing fields, bad UUID, unknown zone -- are logged and dropped;
//! they never crash the process and never reach the engine.
//!
//! If a client falls behind the broadcast channel, lagged messages are
//! silently skipped and the client resumes from the most recent one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};
use ward_types::Command;

use crate::state::{AppState, WardBroadcast};

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Serialize a broadcast and send it as a text frame.
///
/// Returns `false` if the client has disconnected.
async fn send_broadcast(socket: &mut WebSocket, message: &WardBroadcast) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize broadcast: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handle the `WebSocket` lifecycle.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before the initial snapshot so no update published in
    // between is lost.
    let mut rx = state.subscribe();

    // Initial full snapshot, so the new observer is consistent with
    // everyone else before the first push arrives.
    let initial = {
        let snap = state.snapshot.read().await;
        WardBroadcast::StateUpdate(snap.state.clone())
    };
    if !send_broadcast(&mut socket, &initial).await {
        debug!("WebSocket client disconnected during initial snapshot");
        return;
    }

    loop {
        tokio::select! {
            // Push notification from the engine.
            result = rx.recv() => {
                match result {
                    Ok(message) => {
                        if !send_broadcast(&mut socket, &message).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Inbound command or connection management frame.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        forward_command(&state, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore binary and pong frames.
                    }
                }
            }
        }
    }
}

/// Parse an inbound text frame and forward the command to the engine.
///
/// Rejection is terminal here: the sender gets no error signal beyond
/// the unchanged snapshot (matching the engine's permissive policy),
/// but the rejection is logged for diagnostics.
async fn forward_command(state: &Arc<AppState>, text: &str) {
    match serde_json::from_str::<Command>(text) {
        Ok(command) => {
            if state.commands.send(command).await.is_err() {
                warn!("Engine command channel closed, dropping command");
            }
        }
        Err(e) => {
            warn!(error = %e, frame = text, "Rejected malformed command frame");
        }
    }
}
