//! Game settings.

use std::collections::HashSet;
use std::time::Duration;

use tron_arena::{Bounds, Color, Direction, Point};
use tron_tick::TickConfig;

/// Spawn slots for the default 1000×600 arena, one per player.
pub const DEFAULT_SPAWN_POINTS: [Point; 4] = [
    Point::new(333, 200),
    Point::new(666, 200),
    Point::new(333, 400),
    Point::new(666, 400),
];

/// Settings shared by every game a room creates.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Arena size.
    pub bounds: Bounds,

    /// One starting cell per player slot.
    pub spawn_points: Vec<Point>,

    /// Heading every trail starts with before direction selection.
    pub initial_heading: Direction,

    /// How long players may re-aim before the first tick.
    pub select_window: Duration,

    /// Tick period and simulation budget.
    pub tick: TickConfig,

    /// Capacity of the intent queue. Intents that don't fit are dropped.
    pub intent_buffer: usize,

    /// Assign spawn slots in random order instead of palette order.
    pub shuffle_spawns: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            spawn_points: DEFAULT_SPAWN_POINTS.to_vec(),
            initial_heading: Direction::Right,
            select_window: Duration::from_secs(3),
            tick: TickConfig::default(),
            intent_buffer: 64,
            shuffle_spawns: true,
        }
    }
}

impl GameConfig {
    /// Most participants one game can hold: one color and one spawn each.
    pub fn max_players(&self) -> usize {
        Color::PALETTE.len().min(self.spawn_points.len())
    }

    /// Drops unusable spawn points and fixes out-of-range values.
    ///
    /// Rules:
    /// - Spawns whose first two cells are not inside the walls are removed.
    /// - Repeated spawns are removed, keeping the first.
    /// - An empty spawn list falls back to [`DEFAULT_SPAWN_POINTS`] with
    ///   default bounds.
    /// - `intent_buffer` is at least 1.
    pub fn validated(mut self) -> Self {
        let bounds = self.bounds;
        let heading = self.initial_heading;
        let before = self.spawn_points.len();
        self.spawn_points
            .retain(|&p| bounds.contains(p) && bounds.contains(p.step(heading)));
        if self.spawn_points.len() < before {
            tracing::warn!(
                dropped = before - self.spawn_points.len(),
                "spawn points outside the arena, ignoring them"
            );
        }
        let before = self.spawn_points.len();
        let mut seen = HashSet::new();
        self.spawn_points.retain(|&p| seen.insert(p));
        if self.spawn_points.len() < before {
            tracing::warn!(
                dropped = before - self.spawn_points.len(),
                "duplicate spawn points, ignoring them"
            );
        }
        if self.spawn_points.is_empty() {
            tracing::warn!("no usable spawn points, using defaults");
            self.bounds = Bounds::default();
            self.spawn_points = DEFAULT_SPAWN_POINTS.to_vec();
        }
        self.intent_buffer = self.intent_buffer.max(1);
        self.tick = self.tick.validated();
        self
    }
}
