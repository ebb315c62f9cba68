//! Command processing: the boundary between validated client commands
//! and the state store.
//!
//! Shape validation (ids present, known command type, known zone)
//! happens at the observer's deserialization boundary; by the time a
//! [`Command`] reaches this module it is structurally sound. Each
//! command maps to exactly one store operation. The caller broadcasts a
//! fresh snapshot after every command -- including move refusals and
//! silent no-ops -- because the refusal log entry is itself observable.

use chrono::{DateTime, Utc};
use tracing::debug;
use ward_types::{Command, LogEntry};

use crate::config::HospitalConfig;
use crate::state::{HospitalState, MoveOutcome};

/// Apply one command to the state store.
///
/// Returns the log entries the command appended (zero entries for
/// silent no-ops such as treating an unknown patient). Processing is
/// synchronous and runs to completion before the runner dispatches the
/// next timer or command.
pub fn apply(
    state: &mut HospitalState,
    command: Command,
    config: &HospitalConfig,
    now: DateTime<Utc>,
) -> Vec<LogEntry> {
    match command {
        Command::Treat { id } => {
            debug!(patient_id = %id, "treat command");
            state.apply_treatment(id, now).into_iter().collect()
        }
        Command::Order { resource } => {
            debug!(resource = %resource, "order command");
            vec![state.apply_order(&resource, config.order_increment, now)]
        }
        Command::Move { id, zone } => {
            debug!(patient_id = %id, zone = %zone, "move command");
            match state.apply_move(id, zone, now) {
                MoveOutcome::Moved(entry) | MoveOutcome::Refused(entry) => vec![entry],
                MoveOutcome::UnknownPatient => Vec::new(),
            }
        }
    }
}
