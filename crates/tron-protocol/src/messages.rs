//! Messages exchanged with clients.
//!
//! Both directions are internally tagged enums, so every frame is a flat
//! JSON object:
//!
//! ```json
//! {"type":"JoinRoom","room":"lobby"}
//! {"type":"Move","direction":"u"}
//! {"type":"RefreshMap","state":{"blue":[{"x":333,"y":400},{"x":335,"y":400}]}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tron_arena::{ArenaSnapshot, Color, Direction, Point};
use tron_game::GameEvent;

/// Client → server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Attach to a room. Must be the first message on a connection.
    JoinRoom { room: String },
    /// Enter the room's next game.
    Ready,
    /// Steer. Before the game starts this picks the initial heading.
    Move { direction: Direction },
    /// Close the connection.
    Leave,
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Admitted to a game under `color`.
    Ready { color: Color },
    /// Every trail, with `y` counted from the top edge.
    RefreshMap { state: BTreeMap<Color, Vec<Point>> },
    /// The game is over. `null` means a draw.
    GameEnd { winner: Option<Color> },
    Error { message: String },
}

impl ServerMessage {
    pub fn refresh_map(snapshot: &ArenaSnapshot) -> Self {
        Self::RefreshMap {
            state: snapshot.flipped(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<&GameEvent> for ServerMessage {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::Snapshot(snapshot) => Self::refresh_map(snapshot),
            GameEvent::End { winner } => Self::GameEnd { winner: *winner },
        }
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};
    use tron_arena::Bounds;

    use super::*;
    use crate::{Codec, JsonCodec, ProtocolError};

    fn to_value(msg: &ServerMessage) -> Value {
        let bytes = JsonCodec.encode(msg).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn decode(text: &str) -> Result<ClientMessage, ProtocolError> {
        JsonCodec.decode(text.as_bytes())
    }

    // =====================================================================
    // ClientMessage
    // =====================================================================

    #[test]
    fn test_decode_join_room() {
        let msg = decode(r#"{"type":"JoinRoom","room":"lobby"}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinRoom { room: "lobby".into() });
    }

    #[test]
    fn test_decode_unit_messages() {
        assert_eq!(decode(r#"{"type":"Ready"}"#).unwrap(), ClientMessage::Ready);
        assert_eq!(decode(r#"{"type":"Leave"}"#).unwrap(), ClientMessage::Leave);
    }

    #[test]
    fn test_decode_move_short_and_long_names() {
        assert_eq!(
            decode(r#"{"type":"Move","direction":"u"}"#).unwrap(),
            ClientMessage::Move {
                direction: Direction::Up
            }
        );
        assert_eq!(
            decode(r#"{"type":"Move","direction":"left"}"#).unwrap(),
            ClientMessage::Move {
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_encode_move_uses_short_name() {
        let bytes = JsonCodec
            .encode(&ClientMessage::Move {
                direction: Direction::Right,
            })
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"type": "Move", "direction": "r"}));
    }

    // =====================================================================
    // ServerMessage
    // =====================================================================

    #[test]
    fn test_ready_shape() {
        let value = to_value(&ServerMessage::Ready { color: Color::Blue });
        assert_eq!(value, json!({"type": "Ready", "color": "blue"}));
    }

    #[test]
    fn test_game_end_shapes() {
        let value = to_value(&ServerMessage::GameEnd {
            winner: Some(Color::Orange),
        });
        assert_eq!(value, json!({"type": "GameEnd", "winner": "orange"}));

        let value = to_value(&ServerMessage::GameEnd { winner: None });
        assert_eq!(value, json!({"type": "GameEnd", "winner": null}));
    }

    #[test]
    fn test_error_shape() {
        let value = to_value(&ServerMessage::error("room lobby is full"));
        assert_eq!(
            value,
            json!({"type": "Error", "message": "room lobby is full"})
        );
    }

    #[test]
    fn test_refresh_map_flips_y() {
        let snapshot = ArenaSnapshot {
            bounds: Bounds::new(1000, 600),
            trails: BTreeMap::from([(
                Color::Red,
                vec![Point::new(666, 200), Point::new(668, 200)],
            )]),
        };

        let value = to_value(&ServerMessage::refresh_map(&snapshot));

        assert_eq!(
            value,
            json!({
                "type": "RefreshMap",
                "state": {"red": [{"x": 666, "y": 400}, {"x": 668, "y": 400}]}
            })
        );
    }

    #[test]
    fn test_from_game_event() {
        let snapshot = Arc::new(ArenaSnapshot {
            bounds: Bounds::new(10, 10),
            trails: BTreeMap::from([(Color::Blue, vec![Point::new(1, 1), Point::new(2, 1)])]),
        });
        let msg = ServerMessage::from(&GameEvent::Snapshot(snapshot));
        assert_eq!(
            msg,
            ServerMessage::RefreshMap {
                state: BTreeMap::from([(Color::Blue, vec![Point::new(1, 9), Point::new(2, 9)])]),
            }
        );

        let msg = ServerMessage::from(&GameEvent::End { winner: None });
        assert_eq!(msg, ServerMessage::GameEnd { winner: None });
    }

    // =====================================================================
    // Malformed input
    // =====================================================================

    #[test]
    fn test_decode_unknown_type_fails() {
        let err = decode(r#"{"type":"Teleport"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_decode_bad_direction_fails() {
        let err = decode(r#"{"type":"Move","direction":"sideways"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_decode_not_json_fails() {
        assert!(decode("hello").is_err());
        assert!(decode(r#"{"room":"lobby"}"#).is_err());
    }
}
