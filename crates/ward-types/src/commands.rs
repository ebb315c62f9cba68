//! Inbound command types for observer-engine communication.
//!
//! Commands are the only way connected clients mutate shared state. They
//! arrive as internally-tagged JSON text frames on the observer
//! WebSocket, are deserialized at that boundary, and travel to the
//! engine over an mpsc channel. A frame that fails to deserialize --
//! unknown `type`, missing field, malformed UUID, unknown zone -- is
//! rejected and logged at the boundary and never reaches the engine.

use serde::{Deserialize, Serialize};

use crate::enums::Zone;
use crate::ids::PatientId;

/// A validated client command ready for the engine to process.
///
/// Wire format examples:
///
/// ```json
/// {"type":"treat","id":"0192f0c1-..."}
/// {"type":"order","resource":"blood"}
/// {"type":"move","id":"0192f0c1-...","zone":"emergency"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Mark a waiting patient as treated.
    Treat {
        /// The patient to treat.
        id: PatientId,
    },
    /// Order a fixed increment of a resource.
    Order {
        /// Resource name; created at the increment if not yet stocked.
        resource: String,
    },
    /// Relocate a patient to another zone.
    Move {
        /// The patient to relocate.
        id: PatientId,
        /// Target zone.
        zone: Zone,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_treat() {
        let id = PatientId::new();
        let json = format!("{{\"type\":\"treat\",\"id\":\"{id}\"}}");
        let cmd: Result<Command, _> = serde_json::from_str(&json);
        assert_eq!(cmd.ok(), Some(Command::Treat { id }));
    }

    #[test]
    fn parse_order() {
        let cmd: Result<Command, _> =
            serde_json::from_str("{\"type\":\"order\",\"resource\":\"plasma\"}");
        assert_eq!(
            cmd.ok(),
            Some(Command::Order {
                resource: String::from("plasma")
            })
        );
    }

    #[test]
    fn parse_move() {
        let id = PatientId::new();
        let json = format!("{{\"type\":\"move\",\"id\":\"{id}\",\"zone\":\"intensive_care\"}}");
        let cmd: Result<Command, _> = serde_json::from_str(&json);
        assert_eq!(
            cmd.ok(),
            Some(Command::Move {
                id,
                zone: Zone::IntensiveCare
            })
        );
    }

    #[test]
    fn unknown_command_type_rejected() {
        let cmd: Result<Command, _> =
            serde_json::from_str("{\"type\":\"discharge\",\"id\":\"whatever\"}");
        assert!(cmd.is_err());
    }

    #[test]
    fn malformed_uuid_rejected() {
        let cmd: Result<Command, _> =
            serde_json::from_str("{\"type\":\"treat\",\"id\":\"not-a-uuid\"}");
        assert!(cmd.is_err());
    }
}
