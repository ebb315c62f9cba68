//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- `WebSocket` state stream + inbound command channel
/// - `GET /api/state` -- full current snapshot
/// - `GET /api/patients` -- list patients
/// - `GET /api/patients/:id` -- single patient
/// - `GET /api/log` -- session log
/// - `GET /api/report` -- session report
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // REST API
        .route("/api/state", get(handlers::get_state))
        .route("/api/patients", get(handlers::list_patients))
        .route("/api/patients/{id}", get(handlers::get_patient))
        .route("/api/log", get(handlers::list_log))
        .route("/api/report", get(handlers::get_report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
