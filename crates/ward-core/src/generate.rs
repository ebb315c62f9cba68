//! Random patient generation.
//!
//! One generator serves both the periodic arrival timer and the surge
//! scenario, so every patient in the session has the same shape. The
//! random source is injected (any [`Rng`]) so tests can seed a
//! deterministic generator.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};
use rand::seq::IndexedRandom;
use ward_types::{Patient, PatientId, PatientStatus, Severity, Zone};

/// Length of the random name suffix. Six alphanumeric characters make
/// collisions rare without any uniqueness bookkeeping.
const NAME_SUFFIX_LEN: usize = 6;

/// Generate a new patient: fresh id, random display name, uniform-random
/// severity, waiting in triage.
pub fn generate_patient<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Patient {
    let suffix = Alphanumeric.sample_string(rng, NAME_SUFFIX_LEN);
    let severity = Severity::ALL.choose(rng).copied().unwrap_or(Severity::Low);
    Patient {
        id: PatientId::new(),
        name: format!("Patient-{suffix}"),
        severity,
        status: PatientStatus::Waiting,
        zone: Zone::Triage,
        arrived_at: now,
    }
}
