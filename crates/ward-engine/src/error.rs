//! Error types for the engine binary.

use ward_core::config::ConfigError;
use ward_observer::startup::StartupError;

/// Errors that can occur during engine startup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The Observer API server could not be started.
    #[error("observer error: {0}")]
    Observer(#[from] StartupError),
}
