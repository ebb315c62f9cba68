//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read from the in-memory [`ObserverSnapshot`] via the
//! shared [`AppState`]; none touch the engine's state store directly.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/state` | Full current snapshot |
//! | `GET` | `/api/patients` | List patients (optional `?status=` filter) |
//! | `GET` | `/api/patients/:id` | Single patient |
//! | `GET` | `/api/log` | Session log (optional `?category=&limit=`) |
//! | `GET` | `/api/report` | Session report, 404 until the session ends |
//!
//! [`ObserverSnapshot`]: crate::state::ObserverSnapshot

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use uuid::Uuid;
use ward_types::{LogCategory, PatientId, PatientStatus};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/patients` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct PatientsQuery {
    /// Filter by care status (`waiting`, `treated`, `deceased`).
    pub status: Option<String>,
}

/// Query parameters for the `GET /api/log` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct LogQuery {
    /// Filter entries by category (e.g. `refusal`, `disruptive_event`).
    pub category: Option<String>,
    /// Maximum number of entries to return, newest last (default 100).
    pub limit: Option<usize>,
}

/// Default number of log entries returned by `GET /api/log`.
const DEFAULT_LOG_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing session status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let patient_count = snapshot.state.patients.len();
    let waiting = snapshot
        .state
        .patients
        .iter()
        .filter(|p| p.status == PatientStatus::Waiting)
        .count();
    let stock_count = snapshot.state.stocks.len();
    let blocked = snapshot.state.blocked_zones.len();
    let log_count = snapshot.log.len();
    let session_state = if snapshot.report.is_some() {
        "REPORTED"
    } else {
        "RUNNING"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Ward Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Ward Observer</h1>
    <p class="subtitle">Hospital emergency-response simulation</p>

    <p>Session: <span class="status">{session_state}</span></p>

    <div>
        <div class="metric">
            <div class="label">Patients</div>
            <div class="value">{patient_count}</div>
        </div>
        <div class="metric">
            <div class="label">Waiting</div>
            <div class="value">{waiting}</div>
        </div>
        <div class="metric">
            <div class="label">Stocked resources</div>
            <div class="value">{stock_count}</div>
        </div>
        <div class="metric">
            <div class="label">Zone blocks</div>
            <div class="value">{blocked}</div>
        </div>
        <div class="metric">
            <div class="label">Log entries</div>
            <div class="value">{log_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/state">/api/state</a> -- Full current snapshot</li>
        <li><a href="/api/patients">/api/patients</a> -- List patients (?status=waiting)</li>
        <li><a href="/api/patients/:id">/api/patients/:id</a> -- Single patient</li>
        <li><a href="/api/log">/api/log</a> -- Session log (?category=refusal&amp;limit=50)</li>
        <li><a href="/api/report">/api/report</a> -- Session report (404 until session end)</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws</code> -- Live state stream + command channel</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/state -- full current snapshot
// ---------------------------------------------------------------------------

/// Return the full current state snapshot (patients, stocks, blocked
/// zones).
pub async fn get_state(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&snapshot.state)?))
}

// ---------------------------------------------------------------------------
// GET /api/patients -- list patients
// ---------------------------------------------------------------------------

/// List all patients in arrival order, optionally filtered by status.
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PatientsQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let status_filter = match query.status.as_deref() {
        None => None,
        Some(raw) => Some(parse_status(raw)?),
    };

    let snapshot = state.snapshot.read().await;
    let patients: Vec<_> = snapshot
        .state
        .patients
        .iter()
        .filter(|p| status_filter.is_none_or(|s| p.status == s))
        .collect();

    Ok(Json(serde_json::to_value(&patients)?))
}

/// Parse a status query value, reusing the wire format of the enum.
fn parse_status(raw: &str) -> Result<PatientStatus, ObserverError> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|_err| ObserverError::InvalidQuery(format!("unknown status: {raw}")))
}

// ---------------------------------------------------------------------------
// GET /api/patients/:id -- single patient
// ---------------------------------------------------------------------------

/// Return a single patient by id.
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|_err| ObserverError::InvalidUuid(format!("invalid patient id: {id}")))?;
    let patient_id = PatientId::from(uuid);

    let snapshot = state.snapshot.read().await;
    let patient = snapshot
        .state
        .patients
        .iter()
        .find(|p| p.id == patient_id)
        .ok_or(ObserverError::PatientNotFound(patient_id))?;

    Ok(Json(serde_json::to_value(patient)?))
}

// ---------------------------------------------------------------------------
// GET /api/log -- session log
// ---------------------------------------------------------------------------

/// Return session log entries in append order, optionally filtered by
/// category and truncated to the newest `limit` entries.
pub async fn list_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let category_filter = match query.category.as_deref() {
        None => None,
        Some(raw) => Some(parse_category(raw)?),
    };
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);

    let snapshot = state.snapshot.read().await;
    let matching: Vec<_> = snapshot
        .log
        .iter()
        .filter(|e| category_filter.is_none_or(|c| e.category == c))
        .collect();
    let skip = matching.len().saturating_sub(limit);
    let entries: Vec<_> = matching.into_iter().skip(skip).collect();

    Ok(Json(serde_json::to_value(&entries)?))
}

/// Parse a category query value, reusing the wire format of the enum.
fn parse_category(raw: &str) -> Result<LogCategory, ObserverError> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|_err| ObserverError::InvalidQuery(format!("unknown category: {raw}")))
}

// ---------------------------------------------------------------------------
// GET /api/report -- session report
// ---------------------------------------------------------------------------

/// Return the session report, or 404 while the session is still running.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    let report = snapshot
        .report
        .as_ref()
        .ok_or(ObserverError::ReportNotReady)?;
    Ok(Json(serde_json::to_value(report)?))
}
