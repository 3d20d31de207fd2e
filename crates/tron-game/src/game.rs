//! Forming games and the handles participants use to steer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tron_arena::{Color, Direction};

use crate::config::GameConfig;
use crate::player::{PlayerHandle, PlayerId};
use crate::runner::GameRunner;

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a game, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(u64);

impl GameId {
    fn next() -> Self {
        Self(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game-{}", self.0)
    }
}

/// A request to steer one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub color: Color,
    pub direction: Direction,
}

/// Cloneable endpoint for submitting intents to a game.
///
/// Valid from the moment the game forms. Intents sent before the game
/// starts running wait in the queue.
#[derive(Debug, Clone)]
pub struct GameHandle {
    id: GameId,
    intents: mpsc::Sender<Intent>,
}

impl GameHandle {
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Queues an intent without waiting. Returns whether it was accepted.
    ///
    /// A full queue or a finished game drops the intent.
    pub fn submit(&self, color: Color, direction: Direction) -> bool {
        match self.intents.try_send(Intent { color, direction }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!(game = %self.id, %color, "intent queue full, dropping intent");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::trace!(game = %self.id, %color, "game over, dropping intent");
                false
            }
        }
    }

    /// Returns `true` once the game's worker has stopped.
    pub fn is_finished(&self) -> bool {
        self.intents.is_closed()
    }
}

/// A game that is still accepting participants.
///
/// Colors are handed out in palette order, each to at most one
/// participant. Once [`is_ready`](Self::is_ready), the owner seals it
/// with [`seal`](Self::seal) and spawns the returned runner.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    config: Arc<GameConfig>,
    min_players: usize,
    players: BTreeMap<Color, PlayerHandle>,
    intents_tx: mpsc::Sender<Intent>,
    intents_rx: mpsc::Receiver<Intent>,
}

impl Game {
    /// Creates a forming game that becomes ready at `min_players`
    /// participants. `min_players` is clamped to `1..=max_players`.
    pub fn new(config: Arc<GameConfig>, min_players: usize) -> Self {
        let min_players = min_players.clamp(1, config.max_players().max(1));
        let (intents_tx, intents_rx) = mpsc::channel(config.intent_buffer.max(1));
        let id = GameId::next();
        tracing::debug!(game = %id, min_players, "game forming");
        Self {
            id,
            config,
            min_players,
            players: BTreeMap::new(),
            intents_tx,
            intents_rx,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn handle(&self) -> GameHandle {
        GameHandle {
            id: self.id,
            intents: self.intents_tx.clone(),
        }
    }

    /// Adds a participant under the first free palette color.
    ///
    /// A player who is already a participant keeps their color and has
    /// their mailbox replaced. Returns the participant's color, or `None`
    /// if no color or spawn slot is left.
    pub fn add_player(&mut self, player: PlayerHandle) -> Option<Color> {
        if let Some(color) = self.color_of(player.id()) {
            tracing::debug!(game = %self.id, player = %player.id(), %color, "player rejoined");
            self.players.insert(color, player);
            return Some(color);
        }
        if self.players.len() >= self.config.max_players() {
            return None;
        }
        let color = Color::PALETTE
            .into_iter()
            .find(|c| !self.players.contains_key(c))?;
        tracing::debug!(game = %self.id, player = %player.id(), %color, "player added");
        self.players.insert(color, player);
        Some(color)
    }

    /// Withdraws `player` before the game is sealed, freeing their color.
    pub fn remove_player(&mut self, player: PlayerId) -> Option<Color> {
        let color = self.color_of(player)?;
        self.players.remove(&color);
        Some(color)
    }

    /// The color held by `player`, if they are a participant.
    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        self.players
            .iter()
            .find(|(_, handle)| handle.id() == player)
            .map(|(&color, _)| color)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn min_players(&self) -> usize {
        self.min_players
    }

    /// Returns `true` once enough participants have joined to start.
    pub fn is_ready(&self) -> bool {
        self.players.len() >= self.min_players
    }

    /// Closes the participant list and hands the game to its worker.
    pub fn seal(self) -> GameRunner {
        tracing::info!(game = %self.id, players = self.players.len(), "game sealed");
        // Only handles keep the intent queue open from here on.
        drop(self.intents_tx);
        GameRunner::new(self.id, self.config, self.players, self.intents_rx)
    }
}
