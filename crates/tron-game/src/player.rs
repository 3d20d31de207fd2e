//! Participants and the events delivered to them.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tron_arena::{ArenaSnapshot, Color};

/// Default mailbox depth. A slow client loses snapshots past this point.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Identifies one connected player for as long as the connection lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Something a game tells its participants.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Arena state after a direction change or a tick.
    Snapshot(Arc<ArenaSnapshot>),
    /// The game is over. `None` means nobody survived.
    End { winner: Option<Color> },
}

/// Receiving side of a player's mailbox.
pub type Mailbox = mpsc::Receiver<GameEvent>;

/// A participant as seen by a game: an identity and a mailbox sender.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    id: PlayerId,
    mailbox: mpsc::Sender<GameEvent>,
}

impl PlayerHandle {
    /// Creates a handle and the mailbox it delivers into.
    pub fn new(id: PlayerId, capacity: usize) -> (Self, Mailbox) {
        let (mailbox, rx) = mpsc::channel(capacity.max(1));
        (Self { id, mailbox }, rx)
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Returns `true` once the receiving side has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.mailbox.is_closed()
    }

    /// Delivers `event` without waiting. Returns whether it was queued.
    ///
    /// Full or closed mailboxes drop the event.
    pub(crate) fn offer(&self, event: GameEvent) -> bool {
        match self.mailbox.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!(player = %self.id, "mailbox full, dropping event");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::trace!(player = %self.id, "mailbox closed, dropping event");
                false
            }
        }
    }
}
