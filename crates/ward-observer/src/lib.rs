//! Observer API server for the Ward hospital simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) that pushes `state_update`,
//!   `disruptive_event`, and `log_entry` notifications to every
//!   connected client via [`tokio::sync::broadcast`], and accepts
//!   inbound `treat` / `order` / `move` commands as JSON text frames
//! - **REST endpoints** for querying simulation state (patients, log,
//!   full snapshot, session report)
//! - **Minimal HTML status page** (`GET /`) showing current patient and
//!   stock counts with links to the API endpoints
//!
//! # Architecture
//!
//! The observer reads from an in-memory [`ObserverSnapshot`] that the
//! engine refreshes after every mutation. REST reads never touch the
//! engine's state store, so serving a request can never block the
//! session loop. A newly connected `WebSocket` client immediately
//! receives one full `state_update` before streaming begins; clients
//! that lag behind the broadcast channel skip ahead to the newest
//! message.
//!
//! [`ObserverSnapshot`]: state::ObserverSnapshot

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::spawn_observer;
pub use state::{AppState, ObserverSnapshot, WardBroadcast};
