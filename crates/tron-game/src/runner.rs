//! The worker that drives one sealed game from direction selection to the
//! final broadcast.
//!
//! The runner is the only owner of the arena. It reads intents from a
//! single queue and writes events into per-player mailboxes, never
//! waiting on either side:
//!
//! ```text
//! GameHandle ──Intent──▶ [ GameRunner: Arena + TickScheduler ] ──GameEvent──▶ mailboxes
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, trace};
use tron_arena::{Arena, Color, Direction, Loser, Trail};
use tron_tick::TickScheduler;

use crate::config::GameConfig;
use crate::game::{GameId, Intent};
use crate::phase::GamePhase;
use crate::player::{GameEvent, PlayerHandle};

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub game_id: GameId,
    /// The sole survivor, or `None` for a draw.
    pub winner: Option<Color>,
    /// Eliminations in the order they happened.
    pub losers: Vec<Loser>,
    /// Ticks simulated while running.
    pub ticks: u64,
}

/// A sealed game, ready to be spawned on its own task.
pub struct GameRunner {
    id: GameId,
    config: Arc<GameConfig>,
    players: BTreeMap<Color, PlayerHandle>,
    intents: mpsc::Receiver<Intent>,
    phase: GamePhase,
}

impl GameRunner {
    pub(crate) fn new(
        id: GameId,
        config: Arc<GameConfig>,
        players: BTreeMap<Color, PlayerHandle>,
        intents: mpsc::Receiver<Intent>,
    ) -> Self {
        Self {
            id,
            config,
            players,
            intents,
            phase: GamePhase::Forming,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Colors taking part, in palette order.
    pub fn colors(&self) -> Vec<Color> {
        self.players.keys().copied().collect()
    }

    /// Plays the game to the end and returns how it went.
    ///
    /// Runs the direction-select window, then ticks until at most one
    /// participant survives. Every participant receives the final
    /// snapshot followed by [`GameEvent::End`].
    pub async fn run(mut self) -> GameOutcome {
        let mut arena = self.spawn_arena();
        let participants = self.players.len();

        self.transition(GamePhase::DirectionSelect);
        self.broadcast_snapshot(&arena);
        let mut open = self.select_directions(&mut arena).await;

        self.transition(GamePhase::Running);
        let mut scheduler = TickScheduler::new(self.config.tick.clone());
        loop {
            let mut buffered: HashMap<Color, Direction> = HashMap::new();
            let info = loop {
                tokio::select! {
                    info = scheduler.wait_for_tick() => break info,
                    intent = self.intents.recv(), if open => match intent {
                        // Last write per color wins within a window.
                        Some(Intent { color, direction }) => {
                            buffered.insert(color, direction);
                        }
                        None => open = false,
                    },
                }
            };

            arena.update(&buffered);
            scheduler.record_tick_end();
            trace!(game = %self.id, tick = info.tick, "tick simulated");
            self.broadcast_snapshot(&arena);

            if arena.losers().len() + 1 >= participants {
                break;
            }
        }

        let survivors = arena.survivors();
        let winner = match survivors.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        self.transition(GamePhase::Ended);
        for player in self.players.values() {
            player.offer(GameEvent::End { winner });
        }
        info!(
            game = %self.id,
            winner = winner.map(|c| c.as_str()).unwrap_or("none"),
            ticks = scheduler.tick_count(),
            "game ended"
        );

        GameOutcome {
            game_id: self.id,
            winner,
            losers: arena.losers().to_vec(),
            ticks: scheduler.tick_count(),
        }
    }

    /// Places one trail per participant on its spawn slot.
    fn spawn_arena(&self) -> Arena {
        let mut slots = self.config.spawn_points.clone();
        if self.config.shuffle_spawns {
            slots.shuffle(&mut rand::rng());
        }
        let heading = self.config.initial_heading;
        let trails = self
            .players
            .keys()
            .zip(slots)
            .map(|(&color, start)| (color, Trail::new(start, heading)))
            .collect();
        Arena::new(self.config.bounds, trails)
    }

    /// Applies initial-direction intents until the window closes.
    ///
    /// Returns `false` if the intent queue closed during the window.
    async fn select_directions(&mut self, arena: &mut Arena) -> bool {
        let deadline = time::sleep(self.config.select_window);
        tokio::pin!(deadline);
        let mut open = true;

        loop {
            tokio::select! {
                () = &mut deadline => break,
                intent = self.intents.recv(), if open => match intent {
                    Some(Intent { color, direction }) => {
                        match arena.change_initial_direction(color, direction) {
                            Ok(true) => self.broadcast_snapshot(arena),
                            Ok(false) => {}
                            Err(e) => debug!(game = %self.id, %color, error = %e, "direction rejected"),
                        }
                    }
                    None => open = false,
                },
            }
        }
        open
    }

    fn broadcast_snapshot(&self, arena: &Arena) {
        let snapshot = Arc::new(arena.snapshot());
        for player in self.players.values() {
            player.offer(GameEvent::Snapshot(Arc::clone(&snapshot)));
        }
    }

    fn transition(&mut self, next: GamePhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid transition {} -> {}",
            self.phase,
            next
        );
        debug!(game = %self.id, from = %self.phase, to = %next, "game phase changed");
        self.phase = next;
    }
}
