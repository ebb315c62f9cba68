//! Configuration loading and typed config structures for the Ward simulation.
//!
//! The canonical configuration lives in `ward-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default matching the original hospital scenario
//! (15 s arrivals, 60 s disruptive events, 10-minute sessions).

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `ward-config.yaml`. All fields have
/// defaults, so an absent or partial file is always usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WardConfig {
    /// Session timing and reproducibility settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Hospital parameters (stocks, surge size, zone block duration).
    #[serde(default)]
    pub hospital: HospitalConfig,

    /// Observer server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `WARD_PORT` environment variable, when set to a valid port,
    /// overrides `server.port` so deployments can remap without editing
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides();
        Ok(config)
    }
}

/// Session timing and reproducibility configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Random seed for reproducible sessions.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Milliseconds between periodic patient arrivals.
    #[serde(default = "default_arrival_interval_ms")]
    pub arrival_interval_ms: u64,

    /// Milliseconds between disruptive-event firings.
    #[serde(default = "default_event_interval_ms")]
    pub event_interval_ms: u64,

    /// Total session duration in milliseconds; the final report fires
    /// once when this elapses.
    #[serde(default = "default_session_duration_ms")]
    pub session_duration_ms: u64,

    /// Whether arrival and event timers keep running after the final
    /// report has fired. When `false` (the default) the session ends
    /// with the report; when `true` it runs until shutdown.
    #[serde(default)]
    pub continue_after_report: bool,
}

impl SessionConfig {
    /// Interval between patient arrivals.
    pub const fn arrival_interval(&self) -> Duration {
        Duration::from_millis(self.arrival_interval_ms)
    }

    /// Interval between disruptive events.
    pub const fn event_interval(&self) -> Duration {
        Duration::from_millis(self.event_interval_ms)
    }

    /// Total session duration.
    pub const fn session_duration(&self) -> Duration {
        Duration::from_millis(self.session_duration_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            arrival_interval_ms: default_arrival_interval_ms(),
            event_interval_ms: default_event_interval_ms(),
            session_duration_ms: default_session_duration_ms(),
            continue_after_report: false,
        }
    }
}

/// Hospital parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HospitalConfig {
    /// Stock levels at session start, keyed by resource name.
    #[serde(default = "default_starting_stocks")]
    pub starting_stocks: BTreeMap<String, u32>,

    /// Units added to a stock per order command.
    #[serde(default = "default_order_increment")]
    pub order_increment: u32,

    /// Number of patients injected by the surge scenario.
    #[serde(default = "default_surge_size")]
    pub surge_size: u32,

    /// How long a disruptive scenario blocks a zone, in milliseconds.
    #[serde(default = "default_zone_block_ms")]
    pub zone_block_ms: u64,
}

impl Default for HospitalConfig {
    fn default() -> Self {
        Self {
            starting_stocks: default_starting_stocks(),
            order_increment: default_order_increment(),
            surge_size: default_surge_size(),
            zone_block_ms: default_zone_block_ms(),
        }
    }
}

/// Observer server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Host address the observer server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port the observer server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Override the port with the `WARD_PORT` environment variable when
    /// set to a valid port number.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("WARD_PORT")
            && let Ok(port) = val.parse::<u16>()
        {
            self.port = port;
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_arrival_interval_ms() -> u64 {
    15_000
}

const fn default_event_interval_ms() -> u64 {
    60_000
}

const fn default_session_duration_ms() -> u64 {
    600_000
}

fn default_starting_stocks() -> BTreeMap<String, u32> {
    let mut m = BTreeMap::new();
    m.insert("blood".to_owned(), 5);
    m.insert("oxygen".to_owned(), 5);
    m.insert("antibiotics".to_owned(), 5);
    m
}

const fn default_order_increment() -> u32 {
    3
}

const fn default_surge_size() -> u32 {
    10
}

const fn default_zone_block_ms() -> u64 {
    60_000
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WardConfig::default();
        assert_eq!(config.session.seed, 42);
        assert_eq!(config.session.arrival_interval_ms, 15_000);
        assert_eq!(config.session.event_interval_ms, 60_000);
        assert_eq!(config.session.session_duration_ms, 600_000);
        assert!(!config.session.continue_after_report);
        assert_eq!(config.hospital.order_increment, 3);
        assert_eq!(config.hospital.surge_size, 10);
        assert_eq!(config.hospital.starting_stocks.get("blood"), Some(&5));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
session:
  seed: 7
  arrival_interval_ms: 5000
  event_interval_ms: 20000
  session_duration_ms: 120000
  continue_after_report: true

hospital:
  starting_stocks:
    blood: 10
    plasma: 2
  order_increment: 5
  surge_size: 4
  zone_block_ms: 30000

server:
  host: "127.0.0.1"
  port: 9090

logging:
  level: "debug"
"#;
        let config = WardConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.session.seed, 7);
        assert!(config.session.continue_after_report);
        assert_eq!(config.hospital.starting_stocks.get("plasma"), Some(&2));
        assert_eq!(config.hospital.surge_size, 4);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "session:\n  seed: 99\n";
        let config = WardConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Seed is overridden, everything else uses defaults.
        assert_eq!(config.session.seed, 99);
        assert_eq!(config.session.arrival_interval_ms, 15_000);
        assert_eq!(config.hospital.order_increment, 3);
    }

    #[test]
    fn parse_empty_mapping() {
        let config = WardConfig::parse("{}");
        assert!(config.is_ok());
    }

    #[test]
    fn durations_convert() {
        let session = SessionConfig::default();
        assert_eq!(session.arrival_interval(), Duration::from_secs(15));
        assert_eq!(session.session_duration(), Duration::from_secs(600));
    }
}
