//! A named room: its connected players and the game it is forming.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tron_arena::Color;
use tron_game::{Game, GameConfig, GameHandle, PlayerHandle, PlayerId};

use crate::RoomError;

/// Point-in-time view of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    pub name: String,
    /// Connections attached to the room.
    pub connected: usize,
    pub max_players: usize,
    /// Participants in the game still forming.
    pub forming: usize,
}

#[derive(Debug)]
struct RoomInner {
    connected: HashSet<PlayerId>,
    open_game: Option<Game>,
}

/// A named room. Created and removed by the [`Hall`](crate::Hall).
#[derive(Debug)]
pub struct Room {
    name: String,
    max_players: usize,
    game_config: Arc<GameConfig>,
    inner: Mutex<RoomInner>,
}

impl Room {
    pub(crate) fn new(name: String, max_players: usize, game_config: Arc<GameConfig>) -> Self {
        Self {
            name,
            max_players,
            game_config,
            inner: Mutex::new(RoomInner {
                connected: HashSet::new(),
                open_game: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Places `player` in the room's forming game and returns that game's
    /// handle and the player's color.
    ///
    /// Creates the game if none is forming. The admission that brings the
    /// game to `max_players` seals it and spawns its worker; the caller
    /// does not wait for the game to run. Admitting a player who is
    /// already in the forming game returns their existing color and
    /// delivers to the new mailbox from then on.
    pub async fn admit(&self, player: PlayerHandle) -> Result<(GameHandle, Color), RoomError> {
        let mut inner = self.inner.lock().await;
        let player_id = player.id();

        let game = inner
            .open_game
            .get_or_insert_with(|| Game::new(Arc::clone(&self.game_config), self.max_players));
        let color = game
            .add_player(player)
            .ok_or_else(|| RoomError::NoFreeColor(self.name.clone()))?;
        let handle = game.handle();
        let ready = game.is_ready();

        tracing::debug!(room = %self.name, player = %player_id, %color, game = %handle.id(), "player admitted");

        if ready {
            if let Some(game) = inner.open_game.take() {
                self.start(game);
            }
        }
        Ok((handle, color))
    }

    /// Seals `game` and runs it on its own task.
    fn start(&self, game: Game) {
        let runner = game.seal();
        let room = self.name.clone();
        tracing::info!(%room, game = %runner.id(), colors = ?runner.colors(), "game started");
        tokio::spawn(async move {
            let outcome = runner.run().await;
            tracing::debug!(
                %room,
                game = %outcome.game_id,
                losers = outcome.losers.len(),
                "game worker finished"
            );
        });
    }

    pub async fn info(&self) -> RoomInfo {
        let inner = self.inner.lock().await;
        RoomInfo {
            name: self.name.clone(),
            connected: inner.connected.len(),
            max_players: self.max_players,
            forming: inner.open_game.as_ref().map_or(0, Game::player_count),
        }
    }

    /// Registers a connection. Fails without changes when the room is
    /// full. Attaching an already attached player succeeds.
    pub(crate) async fn attach(&self, player: PlayerId) -> Result<(), RoomError> {
        let mut inner = self.inner.lock().await;
        if inner.connected.contains(&player) {
            return Ok(());
        }
        if inner.connected.len() >= self.max_players {
            return Err(RoomError::CapacityExceeded {
                room: self.name.clone(),
                max: self.max_players,
            });
        }
        inner.connected.insert(player);
        Ok(())
    }

    /// Unregisters a connection and withdraws it from the forming game.
    /// Returns the number of connections left.
    pub(crate) async fn detach(&self, player: PlayerId) -> usize {
        let mut inner = self.inner.lock().await;
        inner.connected.remove(&player);
        if let Some(game) = inner.open_game.as_mut() {
            if let Some(color) = game.remove_player(player) {
                tracing::debug!(room = %self.name, %player, %color, "player withdrawn from forming game");
            }
        }
        inner.connected.len()
    }
}
