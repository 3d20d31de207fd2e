//! Room configuration.

use tron_game::GameConfig;

/// Settings for every room in a hall.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Most connections a room accepts. Also the number of participants
    /// that starts a game.
    pub max_players: usize,

    /// Settings handed to each game the room creates.
    pub game: GameConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: 4,
            game: GameConfig::default(),
        }
    }
}

impl RoomConfig {
    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called by [`Hall::new`](crate::Hall::new). `max_players` is clamped
    /// to `1..=game.max_players()` so every participant gets a color and
    /// a spawn point.
    pub fn validated(mut self) -> Self {
        self.game = self.game.validated();
        let limit = self.game.max_players();
        let clamped = self.max_players.clamp(1, limit);
        if clamped != self.max_players {
            tracing::warn!(
                requested = self.max_players,
                clamped,
                "max_players out of range, clamping"
            );
            self.max_players = clamped;
        }
        self
    }
}
