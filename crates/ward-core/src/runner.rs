//! The session runner: one task that serializes every state mutation.
//!
//! [`run_session`] multiplexes four mutation sources with
//! `tokio::select!`:
//!
//! - the **arrival timer** (one generated patient per period)
//! - the **event timer** (one random disruptive scenario per period)
//! - the **session-end timer** (single-shot; computes the final report)
//! - the **command channel** (client commands from the observer layer)
//!
//! plus the stop signal from [`SessionControl`]. Because everything runs
//! on this single task, no two store mutations ever interleave and every
//! broadcast snapshot reflects a fully applied state. Each handler runs
//! to completion before the next select arm is dispatched; the only
//! suspension points are the timers and the channel receive.
//!
//! Timers use `interval_at(start + period, period)` so the first firing
//! comes after one full period, matching the original scheduler.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tracing::{info, warn};
use ward_types::{Command, LogEntry, SessionReport, StateSnapshot};

use crate::command;
use crate::config::WardConfig;
use crate::events;
use crate::generate::generate_patient;
use crate::report;
use crate::session::{SessionControl, SessionEndReason};
use crate::state::HospitalState;

/// Callback invoked after each state mutation.
///
/// Implementations bridge the engine to the observer layer: pushing
/// snapshots, discrete event notifications, and freshly appended log
/// entries to connected clients. Callbacks must not block; the runner
/// calls them synchronously on the engine task.
pub trait SessionObserver: Send {
    /// Called with a fresh snapshot after every mutating operation.
    fn on_state_change(&mut self, snapshot: &StateSnapshot);

    /// Called when a disruptive scenario fires, in addition to (not
    /// instead of) the snapshot push.
    fn on_disruptive_event(&mut self, message: &str);

    /// Called for each freshly appended log entry. Best-effort: losing
    /// this notification never loses the entry itself, which lives in
    /// the store's log.
    fn on_log_entry(&mut self, entry: &LogEntry);

    /// Called once when the session-end report is computed.
    fn on_session_report(&mut self, report: &SessionReport);
}

/// A no-op observer for tests.
pub struct NoOpObserver;

impl SessionObserver for NoOpObserver {
    fn on_state_change(&mut self, _snapshot: &StateSnapshot) {}
    fn on_disruptive_event(&mut self, _message: &str) {}
    fn on_log_entry(&mut self, _entry: &LogEntry) {}
    fn on_session_report(&mut self, _report: &SessionReport) {}
}

/// Result of a completed session run.
#[derive(Debug)]
pub struct SessionResult {
    /// Why the session ended.
    pub end_reason: SessionEndReason,
    /// The final report, if the session-end timer fired before shutdown.
    pub report: Option<SessionReport>,
}

/// Forward freshly appended entries and a fresh snapshot to the observer.
fn notify(observer: &mut dyn SessionObserver, state: &HospitalState, entries: &[LogEntry]) {
    for entry in entries {
        observer.on_log_entry(entry);
    }
    observer.on_state_change(&state.snapshot());
}

/// Run one session until the end timer fires or a stop is requested.
///
/// All mutation flows through this loop; the caller owns the state
/// before and after. The command channel closing (all observer handles
/// dropped) is treated as a shutdown request.
pub async fn run_session<R: Rng>(
    state: &mut HospitalState,
    config: &WardConfig,
    rng: &mut R,
    commands: &mut mpsc::Receiver<Command>,
    control: &Arc<SessionControl>,
    observer: &mut dyn SessionObserver,
) -> SessionResult {
    let start = Instant::now();
    let arrival_period = config.session.arrival_interval();
    let event_period = config.session.event_interval();
    let mut arrivals = interval_at(start.checked_add(arrival_period).unwrap_or(start), arrival_period);
    let mut disruptions = interval_at(start.checked_add(event_period).unwrap_or(start), event_period);
    let session_end = tokio::time::sleep(config.session.session_duration());
    tokio::pin!(session_end);

    let mut final_report: Option<SessionReport> = None;

    info!(
        arrival_interval_ms = config.session.arrival_interval_ms,
        event_interval_ms = config.session.event_interval_ms,
        session_duration_ms = config.session.session_duration_ms,
        continue_after_report = config.session.continue_after_report,
        "Session starting"
    );

    loop {
        tokio::select! {
            // Periodic patient arrival.
            _ = arrivals.tick() => {
                let now = Utc::now();
                let patient = generate_patient(rng, now);
                info!(patient = %patient.name, severity = %patient.severity, "Patient admitted");
                let entry = state.apply_arrival(patient, now);
                notify(observer, state, &[entry]);
            }

            // Periodic disruptive scenario.
            _ = disruptions.tick() => {
                let now = Utc::now();
                let scenario = events::select(rng);
                info!(scenario = scenario.label, "Disruptive scenario firing");
                let outcome = events::apply(scenario, state, &config.hospital, rng, now);
                observer.on_disruptive_event(&outcome.message);
                notify(observer, state, &[outcome.entry]);
            }

            // Single-shot session end.
            _ = &mut session_end, if final_report.is_none() => {
                let now = Utc::now();
                let (session_report, entry) = report::finalize_session(state, now);
                info!(
                    patients_total = session_report.patients_total,
                    patients_treated = session_report.patients_treated,
                    deceased_count = session_report.deceased_count,
                    "Session report"
                );
                observer.on_session_report(&session_report);
                notify(observer, state, &[entry]);
                final_report = Some(session_report);

                if !config.session.continue_after_report {
                    control.set_end_reason(SessionEndReason::SessionExpired).await;
                    return SessionResult {
                        end_reason: SessionEndReason::SessionExpired,
                        report: final_report,
                    };
                }
                info!("Session report fired, timers continue until shutdown");
            }

            // Client command from the observer layer.
            cmd = commands.recv() => {
                match cmd {
                    Some(cmd) => {
                        let now = Utc::now();
                        let entries = command::apply(state, cmd, &config.hospital, now);
                        // Broadcast even when nothing was appended: the
                        // sender gets the unchanged snapshot either way.
                        notify(observer, state, &entries);
                    }
                    None => {
                        warn!("Command channel closed, shutting down session");
                        control.set_end_reason(SessionEndReason::Shutdown).await;
                        return SessionResult {
                            end_reason: SessionEndReason::Shutdown,
                            report: final_report,
                        };
                    }
                }
            }

            // External shutdown.
            () = control.wait_for_stop() => {
                info!("Stop requested, ending session");
                control.set_end_reason(SessionEndReason::Shutdown).await;
                return SessionResult {
                    end_reason: SessionEndReason::Shutdown,
                    report: final_report,
                };
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ward_types::LogCategory;

    use super::*;
    use crate::config::{SessionConfig, WardConfig};

    /// Observer that records which callbacks fired.
    #[derive(Default)]
    struct RecordingObserver {
        snapshots: usize,
        disruptions: Vec<String>,
        entries: Vec<LogEntry>,
        reports: Vec<SessionReport>,
    }

    impl SessionObserver for RecordingObserver {
        fn on_state_change(&mut self, _snapshot: &StateSnapshot) {
            self.snapshots = self.snapshots.saturating_add(1);
        }
        fn on_disruptive_event(&mut self, message: &str) {
            self.disruptions.push(message.to_owned());
        }
        fn on_log_entry(&mut self, entry: &LogEntry) {
            self.entries.push(entry.clone());
        }
        fn on_session_report(&mut self, report: &SessionReport) {
            self.reports.push(report.clone());
        }
    }

    fn test_config() -> WardConfig {
        WardConfig {
            session: SessionConfig {
                seed: 42,
                arrival_interval_ms: 10,
                event_interval_ms: 35,
                session_duration_ms: 97,
                continue_after_report: false,
            },
            ..WardConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn session_expires_with_report() {
        let config = test_config();
        let mut state = HospitalState::new(config.hospital.starting_stocks.clone());
        let mut rng = StdRng::seed_from_u64(config.session.seed);
        let (tx, mut rx) = mpsc::channel(8);
        let control = Arc::new(SessionControl::new());
        let mut observer = RecordingObserver::default();

        let result = run_session(
            &mut state,
            &config,
            &mut rng,
            &mut rx,
            &control,
            &mut observer,
        )
        .await;
        drop(tx);

        assert_eq!(result.end_reason, SessionEndReason::SessionExpired);
        let report = result.report.unwrap();
        // 9 periodic arrivals fit before the 97 ms session end; any
        // surge scenario adds more, never fewer.
        assert!(report.patients_total >= 9);
        assert_eq!(
            usize::try_from(report.patients_total).unwrap(),
            state.patients.len()
        );
        // Two disruptive firings (t=35, t=70).
        assert_eq!(observer.disruptions.len(), 2);
        assert_eq!(observer.reports.len(), 1);
        assert_eq!(
            state.log.last().unwrap().category,
            LogCategory::SessionEnd
        );
        assert_eq!(
            control.end_reason().await,
            Some(SessionEndReason::SessionExpired)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn commands_are_processed_and_broadcast() {
        let mut config = test_config();
        // No timers inside the window: only commands mutate.
        config.session.arrival_interval_ms = 10_000;
        config.session.event_interval_ms = 10_000;
        config.session.session_duration_ms = 5_000;

        let mut state = HospitalState::new(config.hospital.starting_stocks.clone());
        let mut rng = StdRng::seed_from_u64(1);
        let (tx, mut rx) = mpsc::channel(8);
        let control = Arc::new(SessionControl::new());
        let mut observer = RecordingObserver::default();

        tx.send(Command::Order {
            resource: String::from("blood"),
        })
        .await
        .unwrap();
        drop(tx);

        let result = run_session(
            &mut state,
            &config,
            &mut rng,
            &mut rx,
            &control,
            &mut observer,
        )
        .await;

        // Channel closure after the command ends the session.
        assert_eq!(result.end_reason, SessionEndReason::Shutdown);
        assert_eq!(state.stocks.get("blood"), Some(&8));
        assert!(observer.snapshots >= 1);
        assert!(
            observer
                .entries
                .iter()
                .any(|e| e.category == LogCategory::Order)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_request_ends_session_without_report() {
        let mut config = test_config();
        config.session.session_duration_ms = 60_000;

        let mut state = HospitalState::new(config.hospital.starting_stocks.clone());
        let mut rng = StdRng::seed_from_u64(2);
        let (tx, mut rx) = mpsc::channel(8);
        let control = Arc::new(SessionControl::new());
        control.request_stop();
        let mut observer = NoOpObserver;

        let result = run_session(
            &mut state,
            &config,
            &mut rng,
            &mut rx,
            &control,
            &mut observer,
        )
        .await;
        drop(tx);

        assert_eq!(result.end_reason, SessionEndReason::Shutdown);
        assert!(result.report.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn continue_after_report_keeps_timers_running() {
        let mut config = test_config();
        config.session.continue_after_report = true;

        let mut state = HospitalState::new(config.hospital.starting_stocks.clone());
        let mut rng = StdRng::seed_from_u64(3);
        let (tx, mut rx) = mpsc::channel(8);
        let control = Arc::new(SessionControl::new());
        let mut observer = RecordingObserver::default();

        // Stop well after the report would have fired.
        let stopper = Arc::clone(&control);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            stopper.request_stop();
        });

        let result = run_session(
            &mut state,
            &config,
            &mut rng,
            &mut rx,
            &control,
            &mut observer,
        )
        .await;
        drop(tx);

        assert_eq!(result.end_reason, SessionEndReason::Shutdown);
        // The report fired and was kept.
        let report = result.report.unwrap();
        // Arrivals continued past the 97 ms report point.
        assert!(state.patients.len() > usize::try_from(report.patients_total).unwrap());
    }
}
