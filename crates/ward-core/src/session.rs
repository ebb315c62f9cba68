//! Shared session control state.
//!
//! [`SessionControl`] is shared between the session runner and whatever
//! requests shutdown (the binary's Ctrl-C handler). The stop flag is an
//! atomic so the runner can poll it lock-free; [`Notify`] wakes the
//! runner's select loop so a stop request takes effect immediately
//! rather than at the next timer firing. Stopping also cancels the
//! pending session-end timer, because the runner task simply returns.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

/// Reason why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEndReason {
    /// The session-end timer fired and `continue_after_report` is off.
    SessionExpired,
    /// An external shutdown (signal or command-channel closure).
    Shutdown,
}

/// Shared stop/shutdown state for one session.
#[derive(Debug, Default)]
pub struct SessionControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes the runner when a stop is requested.
    stop_notify: Notify,

    /// Reason the session ended, if it has.
    end_reason: Mutex<Option<SessionEndReason>>,
}

impl SessionControl {
    /// Create a fresh control block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a clean session stop and wake the runner.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // notify_one stores a permit, so a runner that checks the flag
        // and then awaits cannot miss the wakeup.
        self.stop_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait until a stop is requested. Returns immediately if one
    /// already has been.
    pub async fn wait_for_stop(&self) {
        while !self.stop_requested.load(Ordering::Acquire) {
            self.stop_notify.notified().await;
        }
    }

    /// Record the reason the session ended.
    pub async fn set_end_reason(&self, reason: SessionEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the session ended, if it has.
    pub async fn end_reason(&self) -> Option<SessionEndReason> {
        *self.end_reason.lock().await
    }
}
