//! Core engine for the Ward hospital simulation.
//!
//! This crate owns everything with temporal or state-machine behavior:
//!
//! - [`state`] -- the single-writer state store (patients, stocks,
//!   blocked zones, append-only log) and its atomic mutation operations
//! - [`command`] -- dispatch of validated client commands onto the store
//! - [`events`] -- the disruptive-scenario catalog and uniform selection
//! - [`generate`] -- the random patient generator
//! - [`report`] -- the end-of-session summary
//! - [`session`] -- shared stop/shutdown control state
//! - [`runner`] -- the async session loop multiplexing timers, commands,
//!   and shutdown onto one task
//! - [`config`] -- typed YAML configuration with defaults
//!
//! All mutations are serialized through the runner task: no two store
//! operations ever interleave, so every broadcast snapshot reflects a
//! fully applied state.

pub mod command;
pub mod config;
pub mod events;
pub mod generate;
pub mod report;
pub mod runner;
pub mod session;
pub mod state;

pub use config::{ConfigError, WardConfig};
pub use runner::{NoOpObserver, SessionObserver, SessionResult, run_session};
pub use session::{SessionControl, SessionEndReason};
pub use state::{HospitalState, MoveOutcome};
