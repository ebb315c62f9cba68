//! The hospital state store: single source of truth for the session.
//!
//! [`HospitalState`] owns the patient roster, stock levels, blocked-zone
//! expiries, and the append-only log. It is a single-writer aggregate:
//! only the session runner task calls the mutation operations, so no two
//! mutations ever interleave and every [`snapshot`](HospitalState::snapshot)
//! reflects a fully applied state.
//!
//! Every operation takes `now` as a parameter rather than reading the
//! wall clock, which keeps blocked-zone expiry and log timestamps fully
//! testable.
//!
//! Mutation operations return the log entry (or entries) they appended
//! so the caller can forward them to the broadcast path without
//! re-scanning the log.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use ward_types::{LogCategory, LogEntry, Patient, PatientId, PatientStatus, StateSnapshot, Zone};

/// Outcome of a move operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The patient's zone was updated; a movement entry was appended.
    Moved(LogEntry),
    /// The target zone is blocked; a refusal entry was appended and the
    /// patient was not touched.
    Refused(LogEntry),
    /// No patient matches the given id. Nothing changed and nothing was
    /// logged (permissive operator-error tolerance, see DESIGN.md).
    UnknownPatient,
}

/// The canonical mutable simulation state.
///
/// Fields are public in the same spirit as the rest of the workspace:
/// the runner and scenario code read them directly, but all mutation
/// goes through the named operations so the log stays causally ordered.
#[derive(Debug, Clone)]
pub struct HospitalState {
    /// All patients, in arrival order. Never shrinks during a session.
    pub patients: Vec<Patient>,
    /// Stock levels keyed by resource name. Quantities are unsigned, so
    /// the never-negative invariant holds by construction.
    pub stocks: BTreeMap<String, u32>,
    /// Zone block expiries. Entries may outlive their expiry; readers
    /// must compare against `now` (lazy expiry). Growth is bounded by
    /// the fixed zone count.
    pub blocked_zones: BTreeMap<Zone, DateTime<Utc>>,
    /// Append-only session log in causal order.
    pub log: Vec<LogEntry>,
}

impl HospitalState {
    /// Create a state store with the given starting stocks and no
    /// patients, blocks, or log entries.
    pub const fn new(starting_stocks: BTreeMap<String, u32>) -> Self {
        Self {
            patients: Vec::new(),
            stocks: starting_stocks,
            blocked_zones: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    /// Append a log entry and return a copy for the broadcast path.
    fn push_log(&mut self, category: LogCategory, detail: String, now: DateTime<Utc>) -> LogEntry {
        let entry = LogEntry {
            timestamp: now,
            category,
            detail,
        };
        self.log.push(entry.clone());
        entry
    }

    /// Admit a patient: append to the roster and record an arrival entry.
    ///
    /// Infallible; the roster has no capacity limit.
    pub fn apply_arrival(&mut self, patient: Patient, now: DateTime<Utc>) -> LogEntry {
        let detail = format!("{} ({})", patient.name, patient.severity);
        self.patients.push(patient);
        self.push_log(LogCategory::Arrival, detail, now)
    }

    /// Mark a patient as treated.
    ///
    /// Succeeds only if the patient exists and is currently waiting;
    /// returns the care entry on transition. An unknown id or a patient
    /// already treated is a silent no-op returning `None` -- no error is
    /// surfaced to the command sender.
    pub fn apply_treatment(&mut self, id: PatientId, now: DateTime<Utc>) -> Option<LogEntry> {
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == id && p.status == PatientStatus::Waiting)?;
        patient.status = PatientStatus::Treated;
        let detail = format!("{} treated", patient.name);
        Some(self.push_log(LogCategory::Care, detail, now))
    }

    /// Add `amount` units of a resource, creating the entry if absent.
    ///
    /// The addition saturates, so stock can neither go negative nor
    /// overflow.
    pub fn apply_order(&mut self, resource: &str, amount: u32, now: DateTime<Utc>) -> LogEntry {
        let quantity = self.stocks.entry(resource.to_owned()).or_insert(0);
        *quantity = quantity.saturating_add(amount);
        let detail = format!("{resource} +{amount}");
        self.push_log(LogCategory::Order, detail, now)
    }

    /// Move a patient to a target zone.
    ///
    /// The blocked-zone check runs before the patient lookup, so a move
    /// into a blocked zone is refused (and logged) even when the id is
    /// unknown. On success the patient's zone is updated and a movement
    /// entry appended; on refusal nothing is mutated beyond the log.
    pub fn apply_move(&mut self, id: PatientId, zone: Zone, now: DateTime<Utc>) -> MoveOutcome {
        if self.zone_blocked(zone, now) {
            let entry = self.push_log(LogCategory::Refusal, format!("{zone} blocked"), now);
            return MoveOutcome::Refused(entry);
        }
        let Some(patient) = self.patients.iter_mut().find(|p| p.id == id) else {
            return MoveOutcome::UnknownPatient;
        };
        patient.zone = zone;
        let detail = format!("{} to {zone}", patient.name);
        MoveOutcome::Moved(self.push_log(LogCategory::Movement, detail, now))
    }

    /// Admit a wave of patients with a single disruptive-event entry.
    ///
    /// Used by the surge scenario: the patients come from the same
    /// generator as periodic arrivals but are not individually logged.
    pub fn apply_surge(
        &mut self,
        patients: Vec<Patient>,
        detail: String,
        now: DateTime<Utc>,
    ) -> LogEntry {
        self.patients.extend(patients);
        self.push_log(LogCategory::DisruptiveEvent, detail, now)
    }

    /// Block a zone until `now + duration`.
    ///
    /// Idempotent: repeated calls overwrite with the latest expiry, so
    /// two calls at the same `now` yield the same expiry as one.
    pub fn block_zone(&mut self, zone: Zone, duration: TimeDelta, now: DateTime<Utc>) {
        let expiry = now.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.blocked_zones.insert(zone, expiry);
    }

    /// Whether a zone is currently blocked (`now < expiry`).
    ///
    /// Expired entries remain in the map but no longer block.
    pub fn zone_blocked(&self, zone: Zone, now: DateTime<Utc>) -> bool {
        self.blocked_zones.get(&zone).is_some_and(|expiry| now < *expiry)
    }

    /// Append a disruptive-event entry (used by zone-blocking scenarios).
    pub fn record_event(&mut self, detail: String, now: DateTime<Utc>) -> LogEntry {
        self.push_log(LogCategory::DisruptiveEvent, detail, now)
    }

    /// Append the session-end entry carrying the serialized report.
    pub fn record_session_end(&mut self, detail: String, now: DateTime<Utc>) -> LogEntry {
        self.push_log(LogCategory::SessionEnd, detail, now)
    }

    /// Take a full value copy of the observable state.
    ///
    /// The copy is taken after the triggering mutation completed, so
    /// observers can never see a partially applied update.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            patients: self.patients.clone(),
            stocks: self.stocks.clone(),
            blocked_zones: self.blocked_zones.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use ward_types::Severity;

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    fn patient(name: &str) -> Patient {
        Patient {
            id: PatientId::new(),
            name: name.to_owned(),
            severity: Severity::Critical,
            status: PatientStatus::Waiting,
            zone: Zone::Triage,
            arrived_at: at(0),
        }
    }

    fn empty_state() -> HospitalState {
        HospitalState::new(BTreeMap::new())
    }

    #[test]
    fn arrival_appends_patient_and_log() {
        let mut state = empty_state();
        let entry = state.apply_arrival(patient("Patient-p1"), at(0));

        let snap = state.snapshot();
        assert_eq!(snap.patients.len(), 1);
        assert_eq!(snap.patients.first().unwrap().status, PatientStatus::Waiting);
        assert_eq!(entry.category, LogCategory::Arrival);
        assert!(entry.detail.contains("Patient-p1"));
    }

    #[test]
    fn treatment_transitions_waiting_to_treated() {
        let mut state = empty_state();
        let p = patient("Patient-p1");
        let id = p.id;
        state.apply_arrival(p, at(0));

        let entry = state.apply_treatment(id, at(1));
        assert!(entry.is_some());
        assert_eq!(
            state.patients.first().unwrap().status,
            PatientStatus::Treated
        );

        // Re-treating is a no-op: the status never reverses.
        let again = state.apply_treatment(id, at(2));
        assert!(again.is_none());
        assert_eq!(
            state.patients.first().unwrap().status,
            PatientStatus::Treated
        );
    }

    #[test]
    fn treating_unknown_patient_is_silent_noop() {
        let mut state = empty_state();
        state.apply_arrival(patient("Patient-p1"), at(0));
        let log_len = state.log.len();

        let entry = state.apply_treatment(PatientId::new(), at(1));
        assert!(entry.is_none());
        assert_eq!(state.log.len(), log_len);
        assert_eq!(
            state.patients.first().unwrap().status,
            PatientStatus::Waiting
        );
    }

    #[test]
    fn order_increments_existing_stock() {
        let mut stocks = BTreeMap::new();
        stocks.insert("blood".to_owned(), 5);
        let mut state = HospitalState::new(stocks);

        state.apply_order("blood", 3, at(0));
        assert_eq!(state.stocks.get("blood"), Some(&8));
    }

    #[test]
    fn order_creates_missing_stock() {
        let mut state = empty_state();
        let entry = state.apply_order("plasma", 3, at(0));
        assert_eq!(state.stocks.get("plasma"), Some(&3));
        assert_eq!(entry.category, LogCategory::Order);
    }

    #[test]
    fn order_saturates_instead_of_overflowing() {
        let mut stocks = BTreeMap::new();
        stocks.insert("blood".to_owned(), u32::MAX);
        let mut state = HospitalState::new(stocks);
        state.apply_order("blood", 3, at(0));
        assert_eq!(state.stocks.get("blood"), Some(&u32::MAX));
    }

    #[test]
    fn move_refused_while_blocked_then_allowed_after_expiry() {
        let mut state = empty_state();
        let p = patient("Patient-p1");
        let id = p.id;
        state.apply_arrival(p, at(0));

        state.block_zone(Zone::Emergency, TimeDelta::milliseconds(60_000), at(0));

        // At t=30s the block is active: refusal, zone unchanged.
        let outcome = state.apply_move(id, Zone::Emergency, at(30_000));
        assert!(matches!(outcome, MoveOutcome::Refused(_)));
        assert_eq!(state.patients.first().unwrap().zone, Zone::Triage);
        let refusals = state
            .log
            .iter()
            .filter(|e| e.category == LogCategory::Refusal)
            .count();
        assert_eq!(refusals, 1);

        // At t=70s the block has lapsed: the move succeeds.
        let outcome = state.apply_move(id, Zone::Emergency, at(70_000));
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        assert_eq!(state.patients.first().unwrap().zone, Zone::Emergency);
    }

    #[test]
    fn move_unknown_patient_is_silent_noop() {
        let mut state = empty_state();
        let outcome = state.apply_move(PatientId::new(), Zone::Emergency, at(0));
        assert_eq!(outcome, MoveOutcome::UnknownPatient);
        assert!(state.log.is_empty());
    }

    #[test]
    fn blocked_zone_refuses_even_unknown_patient() {
        // The block check runs first, matching the original behavior.
        let mut state = empty_state();
        state.block_zone(Zone::IntensiveCare, TimeDelta::milliseconds(1000), at(0));
        let outcome = state.apply_move(PatientId::new(), Zone::IntensiveCare, at(500));
        assert!(matches!(outcome, MoveOutcome::Refused(_)));
    }

    #[test]
    fn block_zone_is_idempotent_at_fixed_now() {
        let mut state = empty_state();
        state.block_zone(Zone::Emergency, TimeDelta::milliseconds(60_000), at(0));
        let first = *state.blocked_zones.get(&Zone::Emergency).unwrap();
        state.block_zone(Zone::Emergency, TimeDelta::milliseconds(60_000), at(0));
        let second = *state.blocked_zones.get(&Zone::Emergency).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lazy_expiry_keeps_entry_but_stops_blocking() {
        let mut state = empty_state();
        state.block_zone(Zone::Emergency, TimeDelta::milliseconds(100), at(0));
        assert!(state.zone_blocked(Zone::Emergency, at(99)));
        assert!(!state.zone_blocked(Zone::Emergency, at(100)));
        assert!(state.blocked_zones.contains_key(&Zone::Emergency));
    }

    #[test]
    fn log_is_append_only_and_ordered() {
        let mut state = empty_state();
        state.apply_arrival(patient("Patient-a"), at(0));
        state.apply_order("blood", 3, at(1));
        state.apply_arrival(patient("Patient-b"), at(2));

        let categories: Vec<LogCategory> = state.log.iter().map(|e| e.category).collect();
        assert_eq!(
            categories,
            vec![LogCategory::Arrival, LogCategory::Order, LogCategory::Arrival]
        );
        // Timestamps follow append order.
        assert!(state.log.windows(2).all(|w| match w {
            [a, b] => a.timestamp <= b.timestamp,
            _ => true,
        }));
    }

    #[test]
    fn snapshot_is_a_value_copy() {
        let mut state = empty_state();
        state.apply_arrival(patient("Patient-a"), at(0));
        let snap = state.snapshot();
        state.apply_arrival(patient("Patient-b"), at(1));
        // The earlier snapshot is unaffected by later mutations.
        assert_eq!(snap.patients.len(), 1);
        assert_eq!(state.patients.len(), 2);
    }
}
