//! Shared type definitions for the Ward hospital simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Ward workspace: the engine mutates them, the observer serializes them,
//! and the wire protocol is defined entirely in terms of them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Enumeration types (severity, status, zones, log categories)
//! - [`structs`] -- Core entity structs (patients, log entries, snapshots)
//! - [`commands`] -- Inbound command types for observer-engine communication

pub mod commands;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::Command;
pub use enums::{LogCategory, PatientStatus, Severity, Zone};
pub use ids::PatientId;
pub use structs::{LogEntry, Patient, SessionReport, StateSnapshot};
