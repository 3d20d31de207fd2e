//! Error types for the room layer.

/// Errors that can occur while joining rooms and games.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoomError {
    /// The room already holds its maximum number of connections.
    #[error("room {room} is full ({max} players)")]
    CapacityExceeded { room: String, max: usize },

    /// The forming game has no color left to hand out.
    #[error("no free color in room {0}")]
    NoFreeColor(String),
}
