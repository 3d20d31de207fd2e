//! Error types for the arena.

use crate::Color;

/// Misuse of the arena API by its owning game.
///
/// Normal gameplay outcomes (reversals, crashes) are not errors; they are
/// either ignored or recorded as [`Loser`](crate::Loser)s.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArenaError {
    /// No trail exists for this color.
    #[error("no trail for color {0}")]
    UnknownColor(Color),

    /// The initial heading can only be changed before the first tick.
    #[error("the match has already started")]
    AlreadyStarted,
}
