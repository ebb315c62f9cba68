//! Core entity structs for the Ward hospital simulation.
//!
//! Everything here is plain serializable data. Mutation rules live in
//! `ward-core`; the observer serves these types as-is over JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{LogCategory, PatientStatus, Severity, Zone};
use crate::ids::PatientId;

/// A patient admitted during the session.
///
/// `id`, `name`, `severity`, and `arrived_at` are fixed at creation;
/// `status` and `zone` change only through the state store's operations.
/// Patients are never removed from the roster during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier assigned at admission.
    pub id: PatientId,
    /// Generated display name (`Patient-XXXXXX`).
    pub name: String,
    /// Triage severity, assigned at admission.
    pub severity: Severity,
    /// Current care status.
    pub status: PatientStatus,
    /// Zone the patient currently occupies.
    pub zone: Zone,
    /// Wall-clock time of admission.
    pub arrived_at: DateTime<Utc>,
}

/// One entry in the append-only session log.
///
/// Entries are never mutated or removed; append order is the causal
/// order of state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// What kind of state change this entry records.
    pub category: LogCategory,
    /// Free-text detail.
    pub detail: String,
}

/// A full, read-isolated copy of the observable simulation state.
///
/// This is a value copy taken after a mutation completes -- observers
/// never hold a live reference into the store, so they cannot see a
/// partially applied update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// All patients in arrival order.
    pub patients: Vec<Patient>,
    /// Stock levels keyed by resource name.
    pub stocks: BTreeMap<String, u32>,
    /// Zone block expiries. A zone is blocked iff `now < expiry`;
    /// entries may outlive their expiry (lazy expiry).
    pub blocked_zones: BTreeMap<Zone, DateTime<Utc>>,
}

/// End-of-session summary derived from final state store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Total number of patients admitted during the session.
    pub patients_total: u32,
    /// Number of patients whose status is `treated`.
    pub patients_treated: u32,
    /// Number of patients whose status is `deceased`.
    pub deceased_count: u32,
    /// Final stock levels keyed by resource name.
    pub resources: BTreeMap<String, u32>,
}
