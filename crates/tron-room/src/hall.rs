//! The hall: a directory of rooms keyed by name.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tron_game::{GameConfig, PlayerId};

use crate::{Room, RoomConfig, RoomError, RoomInfo};

/// Owns every room in the process.
///
/// Rooms are created on first join and removed when their last
/// connection leaves. The directory lock is held for the whole join or
/// leave, so concurrent joins on the same name see one room.
#[derive(Debug)]
pub struct Hall {
    config: RoomConfig,
    game_config: Arc<GameConfig>,
    rooms: Mutex<HashMap<String, Arc<Room>>>,
}

impl Hall {
    pub fn new(config: RoomConfig) -> Self {
        let config = config.validated();
        Self {
            game_config: Arc::new(config.game.clone()),
            config,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Attaches `player` to the room called `name`, creating the room if
    /// needed.
    ///
    /// # Errors
    ///
    /// [`RoomError::CapacityExceeded`] when the room already holds
    /// `max_players` connections. The room is left unchanged.
    pub async fn join(&self, name: &str, player: PlayerId) -> Result<Arc<Room>, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = match rooms.get(name) {
            Some(room) => Arc::clone(room),
            None => {
                let room = Arc::new(Room::new(
                    name.to_owned(),
                    self.config.max_players,
                    Arc::clone(&self.game_config),
                ));
                rooms.insert(name.to_owned(), Arc::clone(&room));
                tracing::info!(room = %name, "room created");
                room
            }
        };

        room.attach(player).await?;
        tracing::debug!(room = %name, %player, "player joined room");
        Ok(room)
    }

    /// Detaches `player` from the room called `name` and removes the
    /// room once it is empty. Unknown rooms are ignored.
    pub async fn leave(&self, name: &str, player: PlayerId) {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get(name).cloned() else {
            return;
        };

        let remaining = room.detach(player).await;
        tracing::debug!(room = %name, %player, remaining, "player left room");
        if remaining == 0 {
            rooms.remove(name);
            tracing::info!(room = %name, "room removed");
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn room_info(&self, name: &str) -> Option<RoomInfo> {
        let room = self.rooms.lock().await.get(name).cloned()?;
        Some(room.info().await)
    }
}
