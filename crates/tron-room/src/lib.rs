//! Matchmaking for light-cycle games.
//!
//! The [`Hall`] is a directory of named [`Room`]s. A room counts the
//! connections attached to it and keeps at most one forming game. Each
//! admission places the player in that game; the admission that fills it
//! seals the game and spawns its worker, and the next admission starts a
//! fresh one.
//!
//! Lock order is always hall directory, then room. Neither lock is held
//! across a broadcast or a timer.
//!
//! # Key types
//!
//! - [`Hall`]: creates and removes rooms by name
//! - [`Room`]: connected players plus the forming game
//! - [`RoomConfig`]: capacity and the settings for each game
//! - [`RoomInfo`]: point-in-time view of one room

mod config;
mod error;
mod hall;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use hall::Hall;
pub use room::{Room, RoomInfo};
