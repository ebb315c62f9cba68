//! End-of-session reporting.
//!
//! When the session-end timer fires, the runner derives a summary from
//! the final state store contents, appends a `session_end` log entry
//! carrying the serialized summary, and hands both to the observer
//! callback. Where the summary surfaces (console, dashboard) is the
//! caller's concern.

use chrono::{DateTime, Utc};
use ward_types::{LogEntry, PatientStatus, SessionReport};

use crate::state::HospitalState;

/// Compute the session summary from current store contents.
///
/// `deceased_count` is carried for parity with the report format even
/// though no current mechanism transitions a patient to deceased.
pub fn session_report(state: &HospitalState) -> SessionReport {
    let count_with = |status: PatientStatus| {
        let n = state.patients.iter().filter(|p| p.status == status).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    };
    SessionReport {
        patients_total: u32::try_from(state.patients.len()).unwrap_or(u32::MAX),
        patients_treated: count_with(PatientStatus::Treated),
        deceased_count: count_with(PatientStatus::Deceased),
        resources: state.stocks.clone(),
    }
}

/// Compute the report and append the `session_end` log entry.
///
/// The entry's detail is the JSON-serialized summary, so the report
/// survives in the authoritative log even if no observer is connected
/// when it fires.
pub fn finalize_session(
    state: &mut HospitalState,
    now: DateTime<Utc>,
) -> (SessionReport, LogEntry) {
    let report = session_report(state);
    let detail =
        serde_json::to_string(&report).unwrap_or_else(|_| String::from("report serialization failed"));
    let entry = state.record_session_end(detail, now);
    (report, entry)
}
