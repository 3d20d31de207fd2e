//! Unified error type for the server.

use tron_protocol::ProtocolError;
use tron_room::RoomError;
use tron_transport::TransportError;

/// Top-level error wrapping every crate-specific error.
#[derive(Debug, thiserror::Error)]
pub enum TronError {
    /// Binding, accepting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Joining a room or game failed.
    #[error(transparent)]
    Room(#[from] RoomError),
}
