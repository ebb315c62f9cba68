//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for push notifications, the
//! in-memory snapshot the REST endpoints serve, and the command channel
//! into the engine. The engine refreshes the snapshot after every
//! mutation; the observer only ever reads it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast, mpsc};
use ward_types::{Command, LogEntry, SessionReport, StateSnapshot};

/// Capacity of the broadcast channel for push notifications.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// A push notification sent to every connected `WebSocket` client.
///
/// Serialized as internally tagged JSON:
///
/// ```json
/// {"type":"state_update","patients":[...],"stocks":{...},"blocked_zones":{...}}
/// {"type":"disruptive_event","message":"Fire in the emergency room!"}
/// {"type":"log_entry","entry":{...}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WardBroadcast {
    /// The full current state, sent after every mutating operation.
    StateUpdate(StateSnapshot),
    /// A discrete disruptive-event notification, sent in addition to
    /// the accompanying state update.
    DisruptiveEvent {
        /// Operator-facing message describing the scenario.
        message: String,
    },
    /// A freshly appended log line for incremental display.
    /// Best-effort: the authoritative log lives in the engine's store.
    LogEntry {
        /// The appended entry.
        entry: LogEntry,
    },
}

/// In-memory snapshot of the simulation served by REST endpoints.
///
/// Refreshed by the engine after every mutation. REST reads are served
/// from this copy so the observer never blocks the session loop.
#[derive(Debug, Clone, Default)]
pub struct ObserverSnapshot {
    /// The latest state snapshot (patients, stocks, blocked zones).
    pub state: StateSnapshot,
    /// The session log as of the latest refresh.
    pub log: Vec<LogEntry>,
    /// The session report, once the session-end timer has fired.
    pub report: Option<SessionReport>,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// broadcast sender pushes notifications to all connected `WebSocket`
/// clients; the command sender feeds validated client commands into the
/// engine's session loop.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast sender for push notifications.
    pub tx: broadcast::Sender<WardBroadcast>,
    /// The current observer snapshot (refreshed after each mutation).
    pub snapshot: Arc<RwLock<ObserverSnapshot>>,
    /// Channel into the engine for validated client commands.
    pub commands: mpsc::Sender<Command>,
}

impl AppState {
    /// Create a new application state with an empty snapshot.
    ///
    /// `commands` is the sending half of the engine's command channel.
    pub fn new(commands: mpsc::Sender<Command>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(ObserverSnapshot::default())),
            commands,
        }
    }

    /// Replace the snapshot's state wholesale.
    ///
    /// Called once at startup, before the server accepts connections,
    /// so the first connecting client sees the store's starting
    /// contents (stocks in particular) rather than an empty default.
    pub async fn seed_state(&self, state: StateSnapshot) {
        self.snapshot.write().await.state = state;
    }

    /// Subscribe to the push-notification channel.
    pub fn subscribe(&self) -> broadcast::Receiver<WardBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a notification to all connected clients.
    ///
    /// Returns the number of receivers that got the message. Returns 0
    /// if no clients are connected (this is not an error).
    pub fn broadcast(&self, message: WardBroadcast) -> usize {
        // send returns Err only when there are zero receivers, which is
        // normal when no WebSocket clients are connected.
        self.tx.send(message).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_with_no_subscribers_returns_zero() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let state = AppState::new(cmd_tx);
        let sent = state.broadcast(WardBroadcast::DisruptiveEvent {
            message: String::from("test"),
        });
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_broadcast() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let state = AppState::new(cmd_tx);
        let mut rx = state.subscribe();
        let sent = state.broadcast(WardBroadcast::StateUpdate(StateSnapshot::default()));
        assert_eq!(sent, 1);
        let msg = rx.recv().await.ok();
        assert_eq!(msg, Some(WardBroadcast::StateUpdate(StateSnapshot::default())));
    }

    #[tokio::test]
    async fn seeded_state_is_visible_before_any_broadcast() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let state = AppState::new(cmd_tx);

        let mut initial = StateSnapshot::default();
        initial.stocks.insert(String::from("blood"), 5);
        initial.stocks.insert(String::from("oxygen"), 5);
        initial.stocks.insert(String::from("antibiotics"), 5);
        state.seed_state(initial).await;

        // What a client connecting before the first mutation would see.
        let snap = state.snapshot.read().await;
        assert_eq!(snap.state.stocks.len(), 3);
        assert_eq!(snap.state.stocks.get("blood"), Some(&5));
    }

    #[test]
    fn state_update_wire_format_is_flattened() {
        let msg = WardBroadcast::StateUpdate(StateSnapshot::default());
        let json = serde_json::to_string(&msg).unwrap_or_default();
        assert!(json.contains("\"type\":\"state_update\""));
        assert!(json.contains("\"patients\""));
        assert!(json.contains("\"blocked_zones\""));
    }
}
