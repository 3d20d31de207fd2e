//! Match lifecycle for light-cycle games.
//!
//! A [`Game`] collects participants while it forms. Sealing it yields a
//! [`GameRunner`], a self-contained worker that owns the arena and drives
//! the match on its own Tokio task:
//!
//! ```text
//! Forming → DirectionSelect → Running → Ended
//! ```
//!
//! Participants never touch the arena. They submit intents through a
//! [`GameHandle`] and receive [`GameEvent`]s in their mailbox, which the
//! runner fills with non-blocking sends.
//!
//! # Key types
//!
//! - [`Game`]: a forming game, owned by its room
//! - [`GameRunner`]: the sealed game's worker
//! - [`GameHandle`]: cloneable intent submission endpoint
//! - [`PlayerHandle`]: one participant's mailbox sender
//! - [`GameConfig`] / [`GamePhase`]: settings and lifecycle states

mod config;
mod game;
mod phase;
mod player;
mod runner;

pub use config::{DEFAULT_SPAWN_POINTS, GameConfig};
pub use game::{Game, GameHandle, GameId, Intent};
pub use phase::GamePhase;
pub use player::{DEFAULT_MAILBOX_CAPACITY, GameEvent, Mailbox, PlayerHandle, PlayerId};
pub use runner::{GameOutcome, GameRunner};
