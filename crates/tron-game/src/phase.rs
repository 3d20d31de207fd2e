//! Game lifecycle state machine.

use std::fmt;

/// The lifecycle state of a game.
///
/// Transitions are strictly ordered, no skipping:
///
/// ```text
/// Forming → DirectionSelect → Running → Ended
/// ```
///
/// - **Forming**: accepting participants; owned by a room.
/// - **DirectionSelect**: sealed; players may re-aim their starting
///   heading until the selection window closes.
/// - **Running**: fixed-period ticks advance the arena.
/// - **Ended**: a winner (or a draw) has been broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Forming,
    DirectionSelect,
    Running,
    Ended,
}

impl GamePhase {
    /// Returns `true` while new participants may still join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Forming)
    }

    /// Returns `true` while the game worker is consuming intents.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::DirectionSelect | Self::Running)
    }

    /// The next state, or `None` from `Ended`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Forming => Some(Self::DirectionSelect),
            Self::DirectionSelect => Some(Self::Running),
            Self::Running => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forming => write!(f, "Forming"),
            Self::DirectionSelect => write!(f, "DirectionSelect"),
            Self::Running => write!(f, "Running"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}
