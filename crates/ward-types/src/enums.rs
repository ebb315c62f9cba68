//! Enumeration types for the Ward hospital simulation.
//!
//! All enums serialize as `snake_case` strings so the wire format stays
//! readable in the observer's JSON payloads and in log details.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Triage severity assigned to a patient at admission.
///
/// Immutable once assigned; the arrival generator picks uniformly at
/// random among the three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor condition, can wait.
    Low,
    /// Serious but stable condition.
    Medium,
    /// Life-threatening condition.
    Critical,
}

impl Severity {
    /// All severity levels, in ascending order of urgency.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::Critical];
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Patient status
// ---------------------------------------------------------------------------

/// Care status of a patient.
///
/// The only reachable transition is `Waiting -> Treated` via the treat
/// command. `Deceased` exists for reporting parity but no command or
/// scenario currently produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    /// Admitted, not yet seen by staff.
    Waiting,
    /// Treatment completed.
    Treated,
    /// Died during the session.
    Deceased,
}

impl core::fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Treated => "treated",
            Self::Deceased => "deceased",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// A physical area of the hospital a patient can occupy.
///
/// The set is closed: an inbound move command naming anything else fails
/// deserialization and is rejected at the observer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Intake area where every patient starts.
    Triage,
    /// Emergency room.
    Emergency,
    /// Intensive care unit.
    IntensiveCare,
}

impl core::fmt::Display for Zone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Triage => "triage",
            Self::Emergency => "emergency",
            Self::IntensiveCare => "intensive_care",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Log categories
// ---------------------------------------------------------------------------

/// Category of an entry in the append-only session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    /// A patient was admitted by the arrival scheduler.
    Arrival,
    /// A patient was treated.
    Care,
    /// Stock was ordered.
    Order,
    /// A patient was moved between zones.
    Movement,
    /// A move was refused because the target zone is blocked.
    Refusal,
    /// A disruptive scenario fired.
    DisruptiveEvent,
    /// The session ended and the final report was recorded.
    SessionEnd,
}

impl core::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Arrival => "arrival",
            Self::Care => "care",
            Self::Order => "order",
            Self::Movement => "movement",
            Self::Refusal => "refusal",
            Self::DisruptiveEvent => "disruptive_event",
            Self::SessionEnd => "session_end",
        };
        f.write_str(s)
    }
}
