//! Wire protocol for the light-cycle server.
//!
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]): what travels
//!   over a connection, one JSON object per text frame, tagged by its
//!   `"type"` field.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong on the way.
//!
//! Snapshots go out with `y` counted from the top edge, so a canvas can
//! draw them without transforming coordinates.

mod codec;
mod error;
mod messages;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{ClientMessage, ServerMessage};
