//! # Tron
//!
//! A multiplayer light-cycle game server over WebSockets.
//!
//! Players connect, name a room, and are matched into games of a fixed
//! size. Each game runs on its own task: a short window to pick a
//! starting heading, then fixed-period ticks until one trail is left.
//!
//! ```rust,no_run
//! use tron::prelude::*;
//!
//! # async fn start() -> Result<(), TronError> {
//! let server = TronServer::builder().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::TronError;
pub use server::{DEFAULT_JOIN_TIMEOUT, TronServer, TronServerBuilder};

pub mod prelude {
    pub use crate::{TronError, TronServer, TronServerBuilder};
    pub use tron_arena::{Bounds, Color, Direction, Point};
    pub use tron_game::GameConfig;
    pub use tron_protocol::{ClientMessage, ServerMessage};
    pub use tron_room::RoomConfig;
    pub use tron_tick::TickConfig;
}
