//! Client -> Server messages.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Message sent by a client. All positions are canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Local player state report.
    Move {
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        /// Client wall-clock time in milliseconds.
        timestamp: f64,
    },
    /// The local player touched the cheese.
    CollectCheese,
    /// The local player reached the hole while carrying the cheese.
    ReachHole,
    /// Shaman platform construction request.
    BuildPlatform {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        angle: f32,
    },
    /// Round-trip probe.
    Ping,
}

impl ClientMessage {
    /// Parse a client message from a raw text frame.
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.is_empty() {
            return Err(ProtocolError::EmptyFrame);
        }
        serde_json::from_slice(data).map_err(ProtocolError::Malformed)
    }

    /// Encode into a JSON text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Wire name of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Move { .. } => "move",
            ClientMessage::CollectCheese => "collectCheese",
            ClientMessage::ReachHole => "reachHole",
            ClientMessage::BuildPlatform { .. } => "buildPlatform",
            ClientMessage::Ping => "ping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_wire_shape() {
        let msg = ClientMessage::Move {
            x: 790.0,
            y: 10.0,
            vx: 3.0,
            vy: -1.5,
            timestamp: 1000.0,
        };
        let json: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "move");
        assert_eq!(json["x"], 790.0);
        assert_eq!(json["vy"], -1.5);
        assert_eq!(json["timestamp"], 1000.0);
    }

    #[test]
    fn test_unit_messages_carry_only_type() {
        let data = ClientMessage::CollectCheese.encode().unwrap();
        assert_eq!(data, r#"{"type":"collectCheese"}"#);
        let data = ClientMessage::Ping.encode().unwrap();
        assert_eq!(data, r#"{"type":"ping"}"#);
    }

    #[test]
    fn test_parse_build_platform() {
        let msg = ClientMessage::parse(
            br#"{"type":"buildPlatform","x":100,"y":200,"width":100,"height":20,"angle":0}"#,
        )
        .unwrap();
        assert_eq!(msg.kind(), "buildPlatform");
        assert!(matches!(msg, ClientMessage::BuildPlatform { width, .. } if width == 100.0));
    }

    #[test]
    fn test_empty_frame() {
        assert!(matches!(ClientMessage::parse(b""), Err(ProtocolError::EmptyFrame)));
    }
}
