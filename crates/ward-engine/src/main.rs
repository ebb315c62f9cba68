//! Engine binary for the Ward hospital simulation.
//!
//! This is the main entry point that wires together the state store,
//! session runner, and Observer API server. It loads configuration,
//! initializes all subsystems, and runs the session loop until the
//! session ends or a shutdown signal arrives.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ward-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Seed the session RNG
//! 4. Create the hospital state from starting stocks
//! 5. Create the command channel and observer state
//! 6. Start the Observer API server
//! 7. Install the Ctrl-C shutdown handler
//! 8. Run the session loop
//! 9. Log the result

mod bridge;
mod error;

use std::path::Path;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ward_core::config::WardConfig;
use ward_core::runner;
use ward_core::session::SessionControl;
use ward_core::state::HospitalState;
use ward_observer::state::AppState;

use crate::bridge::ObserverBridge;
use crate::error::EngineError;

/// Capacity of the command channel between the observer and the engine.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Application entry point for the Ward engine.
///
/// Initializes all subsystems and runs the session loop. Returns an
/// error code on failure.
///
/// # Errors
///
/// Returns an error if configuration loading or observer startup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging so the level applies).
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG overrides the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("ward-engine starting");
    info!(
        seed = config.session.seed,
        arrival_interval_ms = config.session.arrival_interval_ms,
        event_interval_ms = config.session.event_interval_ms,
        session_duration_ms = config.session.session_duration_ms,
        "Configuration loaded"
    );

    // 3. Seed the session RNG.
    let mut rng = StdRng::seed_from_u64(config.session.seed);

    // 4. Create the hospital state.
    let mut state = HospitalState::new(config.hospital.starting_stocks.clone());
    info!(
        stocked_resources = state.stocks.len(),
        "Hospital state initialized"
    );

    // 5. Create the command channel and observer state, seeded with the
    //    store's starting contents so the first connecting client sees
    //    the real stocks rather than an empty snapshot.
    let (cmd_tx, mut cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let app_state = Arc::new(AppState::new(cmd_tx));
    app_state.seed_state(state.snapshot()).await;

    // 6. Start the Observer API server.
    let _observer_handle = ward_observer::spawn_observer(
        config.server.host.clone(),
        config.server.port,
        Arc::clone(&app_state),
    )
    .map_err(EngineError::from)?;
    info!(
        host = config.server.host,
        port = config.server.port,
        "Observer API server started"
    );

    // 7. Install the Ctrl-C shutdown handler.
    let control = Arc::new(SessionControl::new());
    let shutdown_control = Arc::clone(&control);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, requesting session stop");
            shutdown_control.request_stop();
        }
    });

    // 8. Run the session loop.
    let mut observer = ObserverBridge::new(Arc::clone(&app_state));
    let result = runner::run_session(
        &mut state,
        &config,
        &mut rng,
        &mut cmd_rx,
        &control,
        &mut observer,
    )
    .await;

    // 9. Log the result.
    if let Some(report) = &result.report {
        info!(
            patients_total = report.patients_total,
            patients_treated = report.patients_treated,
            deceased_count = report.deceased_count,
            "Final session report"
        );
    }
    info!(
        end_reason = ?result.end_reason,
        log_entries = state.log.len(),
        "ward-engine shutdown complete"
    );

    Ok(())
}

/// Load the main configuration from `ward-config.yaml`.
///
/// Looks for the config file relative to the current working directory
/// and falls back to defaults when it is absent.
fn load_config() -> Result<WardConfig, EngineError> {
    let config_path = Path::new("ward-config.yaml");
    if config_path.exists() {
        let config = WardConfig::from_file(config_path)?;
        Ok(config)
    } else {
        Ok(WardConfig::default())
    }
}
