//! Session observer that feeds the Observer API.
//!
//! After each mutation, this bridge broadcasts a [`WardBroadcast`] to
//! all connected `WebSocket` clients and refreshes the in-memory
//! [`ObserverSnapshot`](ward_observer::ObserverSnapshot) that the REST
//! endpoints serve.

use std::sync::Arc;

use tracing::{debug, info};
use ward_core::runner::SessionObserver;
use ward_observer::state::{AppState, WardBroadcast};
use ward_types::{LogEntry, SessionReport, StateSnapshot};

/// Bridges the session loop to the Observer API.
///
/// Log entries that cannot be written while a REST handler holds the
/// snapshot lock are buffered and flushed on the next successful write,
/// so the REST log copy never develops gaps.
pub struct ObserverBridge {
    state: Arc<AppState>,
    pending_log: Vec<LogEntry>,
}

impl ObserverBridge {
    /// Create a new bridge backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            pending_log: Vec::new(),
        }
    }
}

impl SessionObserver for ObserverBridge {
    fn on_state_change(&mut self, snapshot: &StateSnapshot) {
        let receivers = self
            .state
            .broadcast(WardBroadcast::StateUpdate(snapshot.clone()));
        debug!(receivers, "State update broadcast sent");

        // Use try_write to avoid blocking the session loop. If a REST
        // handler holds the read lock, skip this refresh; the next
        // mutation will catch up.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.state = snapshot.clone();
            snap.log.append(&mut self.pending_log);
        }
    }

    fn on_disruptive_event(&mut self, message: &str) {
        let receivers = self.state.broadcast(WardBroadcast::DisruptiveEvent {
            message: message.to_owned(),
        });
        debug!(receivers, message, "Disruptive event broadcast sent");
    }

    fn on_log_entry(&mut self, entry: &LogEntry) {
        self.state.broadcast(WardBroadcast::LogEntry {
            entry: entry.clone(),
        });

        self.pending_log.push(entry.clone());
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.log.append(&mut self.pending_log);
        }
    }

    fn on_session_report(&mut self, report: &SessionReport) {
        info!(
            patients_total = report.patients_total,
            patients_treated = report.patients_treated,
            deceased_count = report.deceased_count,
            "Session report available via /api/report"
        );

        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.report = Some(report.clone());
            snap.log.append(&mut self.pending_log);
        }
    }
}
