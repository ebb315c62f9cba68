//! Disruptive-scenario catalog and application.
//!
//! On each event-timer firing the runner picks one scenario uniformly at
//! random and applies it. A scenario mutates the state store, appends
//! one `disruptive_event` log entry, and yields an operator-facing
//! message that is pushed to observers as a discrete notification in
//! addition to the regular snapshot broadcast.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use ward_types::{LogEntry, Zone};

use crate::config::HospitalConfig;
use crate::generate::generate_patient;
use crate::state::HospitalState;

/// The kind of disruption a scenario applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// A wave of new patients.
    Surge,
    /// Fire blocks the emergency room.
    Fire,
    /// Equipment failure blocks intensive care.
    EquipmentFailure,
}

/// One entry in the fixed scenario catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    /// Stable machine-readable label.
    pub label: &'static str,
    /// Operator-facing notification message.
    pub message: &'static str,
    /// What the scenario does when applied.
    pub kind: ScenarioKind,
}

/// What a scenario application produced.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// The discrete notification message for observers.
    pub message: String,
    /// The `disruptive_event` log entry that was appended.
    pub entry: LogEntry,
}

/// The fixed scenario catalog.
pub const CATALOG: [Scenario; 3] = [
    Scenario {
        label: "surge",
        message: "Patient surge incoming",
        kind: ScenarioKind::Surge,
    },
    Scenario {
        label: "fire",
        message: "Fire in the emergency room!",
        kind: ScenarioKind::Fire,
    },
    Scenario {
        label: "equipment_failure",
        message: "Equipment failure in intensive care!",
        kind: ScenarioKind::EquipmentFailure,
    },
];

/// Pick one scenario uniformly at random from the catalog.
pub fn select<R: Rng + ?Sized>(rng: &mut R) -> Scenario {
    CATALOG.choose(rng).copied().unwrap_or(Scenario {
        label: "surge",
        message: "Patient surge incoming",
        kind: ScenarioKind::Surge,
    })
}

/// How long a zone-blocking scenario lasts.
fn block_duration(config: &HospitalConfig) -> TimeDelta {
    i64::try_from(config.zone_block_ms)
        .map_or_else(|_| TimeDelta::MAX, TimeDelta::milliseconds)
}

/// Apply a scenario to the state store.
///
/// Surge admits `surge_size` patients from the shared generator with a
/// single log entry; fire and equipment failure block their zone for
/// `zone_block_ms`. Application cannot fail: a scenario always leaves
/// the store in a valid state.
pub fn apply<R: Rng + ?Sized>(
    scenario: Scenario,
    state: &mut HospitalState,
    config: &HospitalConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> ScenarioOutcome {
    let entry = match scenario.kind {
        ScenarioKind::Surge => {
            let patients = (0..config.surge_size)
                .map(|_| generate_patient(rng, now))
                .collect::<Vec<_>>();
            let detail = format!("surge: {} patients admitted", config.surge_size);
            state.apply_surge(patients, detail, now)
        }
        ScenarioKind::Fire => {
            state.block_zone(Zone::Emergency, block_duration(config), now);
            state.record_event("fire: emergency blocked".to_owned(), now)
        }
        ScenarioKind::EquipmentFailure => {
            state.block_zone(Zone::IntensiveCare, block_duration(config), now);
            state.record_event("equipment failure: intensive_care blocked".to_owned(), now)
        }
    };
    ScenarioOutcome {
        message: scenario.message.to_owned(),
        entry,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ward_types::{LogCategory, Severity};

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    fn scenario(kind: ScenarioKind) -> Scenario {
        CATALOG
            .iter()
            .copied()
            .find(|s| s.kind == kind)
            .unwrap()
    }

    #[test]
    fn surge_admits_configured_wave_with_one_log_entry() {
        let mut state = HospitalState::new(BTreeMap::new());
        let config = HospitalConfig::default();
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = apply(scenario(ScenarioKind::Surge), &mut state, &config, &mut rng, at(0));

        assert_eq!(state.patients.len(), 10);
        assert!(state.patients.iter().all(|p| Severity::ALL.contains(&p.severity)));
        let disruptive = state
            .log
            .iter()
            .filter(|e| e.category == LogCategory::DisruptiveEvent)
            .count();
        assert_eq!(disruptive, 1);
        assert_eq!(outcome.entry.category, LogCategory::DisruptiveEvent);
    }

    #[test]
    fn fire_blocks_emergency_for_configured_duration() {
        let mut state = HospitalState::new(BTreeMap::new());
        let config = HospitalConfig::default();
        let mut rng = StdRng::seed_from_u64(6);

        apply(scenario(ScenarioKind::Fire), &mut state, &config, &mut rng, at(0));

        assert!(state.zone_blocked(Zone::Emergency, at(59_999)));
        assert!(!state.zone_blocked(Zone::Emergency, at(60_000)));
        assert!(!state.zone_blocked(Zone::IntensiveCare, at(0)));
    }

    #[test]
    fn equipment_failure_blocks_intensive_care() {
        let mut state = HospitalState::new(BTreeMap::new());
        let config = HospitalConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        apply(
            scenario(ScenarioKind::EquipmentFailure),
            &mut state,
            &config,
            &mut rng,
            at(0),
        );

        assert!(state.zone_blocked(Zone::IntensiveCare, at(30_000)));
        assert!(!state.zone_blocked(Zone::Emergency, at(0)));
    }

    #[test]
    fn selection_covers_whole_catalog() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..100 {
            seen.insert(select(&mut rng).label);
        }
        assert_eq!(seen.len(), CATALOG.len());
    }

    #[test]
    fn catalog_labels_are_unique() {
        let labels: std::collections::BTreeSet<_> =
            CATALOG.iter().map(|s| s.label).collect();
        assert_eq!(labels.len(), CATALOG.len());
    }
}
