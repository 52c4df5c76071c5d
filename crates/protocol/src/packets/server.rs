//! Server -> Client messages.

use serde::{Deserialize, Serialize};

use super::{GameSnapshot, PlatformData, PlayerData};
use crate::ProtocolError;

/// Message received from the server. All positions are canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Session id assignment plus full snapshot. Sent once per connection.
    Init {
        player_id: String,
        game_state: GameSnapshot,
    },
    PlayerJoined {
        player: PlayerData,
    },
    PlayerLeft {
        player_id: String,
    },
    /// Relayed state report of another player.
    PlayerMove {
        player_id: String,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
    },
    CheeseCollected {
        player_id: String,
    },
    PlayerWon {
        player_id: String,
    },
    RoundReset {
        game_state: GameSnapshot,
    },
    PlatformBuilt {
        platform: PlatformData,
    },
    NewShaman {
        shaman_id: String,
    },
    /// Reply to a client `ping`.
    Pong,
}

impl ServerMessage {
    /// Parse a server message from a raw text frame.
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
            ServerMessage::Init { .. } => "init",
            ServerMessage::PlayerJoined { .. } => "playerJoined",
            ServerMessage::PlayerLeft { .. } => "playerLeft",
            ServerMessage::PlayerMove { .. } => "playerMove",
            ServerMessage::CheeseCollected { .. } => "cheeseCollected",
            ServerMessage::PlayerWon { .. } => "playerWon",
            ServerMessage::RoundReset { .. } => "roundReset",
            ServerMessage::PlatformBuilt { .. } => "platformBuilt",
            ServerMessage::NewShaman { .. } => "newShaman",
            ServerMessage::Pong => "pong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlatformId, Point};

    #[test]
    fn test_parse_init() {
        let raw = br#"{
            "type": "init",
            "playerId": "abcdef123",
            "gameState": {
                "players": {
                    "abcdef123": {"id": "abcdef123", "x": 100, "y": 400, "isShaman": true, "hasCheese": false},
                    "zzz": {"id": "zzz", "x": 200, "y": 400}
                },
                "cheese": {"x": 400, "y": 100},
                "hole": {"x": 700, "y": 450},
                "platforms": [{"id": 1, "x": 300, "y": 300, "width": 100, "height": 20, "angle": 0}],
                "shamanId": "abcdef123"
            }
        }"#;
        let msg = ServerMessage::parse(raw).unwrap();
        let ServerMessage::Init { player_id, game_state } = msg else {
            panic!("expected init");
        };
        assert_eq!(player_id, "abcdef123");
        assert_eq!(game_state.players.len(), 2);
        assert!(game_state.players["abcdef123"].is_shaman);
        assert!(!game_state.players["zzz"].has_cheese);
        assert_eq!(game_state.cheese, Some(Point::new(400.0, 100.0)));
        assert_eq!(game_state.platforms[0].id, Some(PlatformId::Number(1)));
        assert_eq!(game_state.shaman_id.as_deref(), Some("abcdef123"));
    }

    #[test]
    fn test_parse_player_move() {
        let msg = ServerMessage::parse(
            br#"{"type":"playerMove","playerId":"p2","x":10,"y":20,"vx":1.5,"vy":-2}"#,
        )
        .unwrap();
        let ServerMessage::PlayerMove { player_id, x, vx, vy, .. } = msg else {
            panic!("expected playerMove");
        };
        assert_eq!(player_id, "p2");
        assert_eq!(x, 10.0);
        assert_eq!(vx, 1.5);
        assert_eq!(vy, -2.0);
    }

    #[test]
    fn test_parse_pong() {
        let msg = ServerMessage::parse(br#"{"type":"pong"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Pong);
        assert_eq!(msg.kind(), "pong");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = ServerMessage::parse(br#"{"type":"playerMove","playerId":"p2","x":10}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let err = ServerMessage::parse(br#"{"type":"teleport"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_new_shaman_field_name() {
        let msg = ServerMessage::NewShaman { shaman_id: "p9".into() };
        let json: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "newShaman");
        assert_eq!(json["shamanId"], "p9");
    }
}
