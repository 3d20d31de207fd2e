//! Trails, the occupancy index and the per-tick update.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{ArenaError, ArenaSnapshot, Color, Direction, Obstacle, Point};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Arena size. The playable area is the open interval
/// `0 < x < width`, `0 < y < height`; anything else is wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if `p` is strictly inside the walls.
    pub fn contains(&self, p: Point) -> bool {
        p.x > 0 && p.x < self.width && p.y > 0 && p.y < self.height
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1000, 600)
    }
}

// ---------------------------------------------------------------------------
// Trail
// ---------------------------------------------------------------------------

/// A player's polyline: one point per corner plus the live head.
///
/// Always holds at least two points. Moving straight rewrites the head in
/// place; turning appends a new point, so the length only ever grows by
/// one per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trail(Vec<Point>);

impl Trail {
    /// A two-point trail starting at `start` and heading `direction`.
    pub fn new(start: Point, direction: Direction) -> Self {
        Self(vec![start, start.step(direction)])
    }

    /// Builds a trail from explicit points. Returns `None` for fewer
    /// than two points.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        (points.len() >= 2).then_some(Self(points))
    }

    /// The live head.
    pub fn head(&self) -> Point {
        self.0[self.0.len() - 1]
    }

    /// The heading implied by the last segment.
    pub fn heading(&self) -> Direction {
        let head = self.head();
        let prev = self.0[self.0.len() - 2];
        if head.x == prev.x {
            if head.y > prev.y {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if head.x > prev.x {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Moves the head forward without adding a corner.
    fn advance(&mut self, next: Point) {
        let last = self.0.len() - 1;
        self.0[last] = next;
    }

    /// Starts a new segment at `next`.
    fn turn(&mut self, next: Point) {
        self.0.push(next);
    }

    /// Re-derives the head from the point before it. Returns the
    /// replaced head.
    fn reorient(&mut self, direction: Direction) -> Point {
        let last = self.0.len() - 1;
        let old = self.0[last];
        self.0[last] = self.0[last - 1].step(direction);
        old
    }
}

// ---------------------------------------------------------------------------
// Loser
// ---------------------------------------------------------------------------

/// An eliminated color and what it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loser {
    pub color: Color,
    pub obstacle: Obstacle,
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// The simulation state of one match.
///
/// `occupied` mirrors every cell each trail has covered and is updated in
/// lock-step with the trails: a new head is inserted once it survives
/// its collision check, and a replaced head is evicted before its
/// replacement goes in.
#[derive(Debug, Clone)]
pub struct Arena {
    bounds: Bounds,
    trails: BTreeMap<Color, Trail>,
    occupied: BTreeMap<Color, HashSet<Point>>,
    losers: Vec<Loser>,
    started: bool,
}

impl Arena {
    /// Creates an arena with the given starting trails. Every point of
    /// every trail is marked occupied.
    pub fn new(bounds: Bounds, trails: BTreeMap<Color, Trail>) -> Self {
        let occupied = trails
            .iter()
            .map(|(&color, trail)| (color, trail.points().iter().copied().collect()))
            .collect();
        Self {
            bounds,
            trails,
            occupied,
            losers: Vec::new(),
            started: false,
        }
    }

    /// Points `color`'s head along `direction` during the pre-game window
    /// without moving its tail.
    ///
    /// Returns `Ok(false)` when the trail already heads that way.
    pub fn change_initial_direction(
        &mut self,
        color: Color,
        direction: Direction,
    ) -> Result<bool, ArenaError> {
        if self.started {
            return Err(ArenaError::AlreadyStarted);
        }
        let trail = self
            .trails
            .get_mut(&color)
            .ok_or(ArenaError::UnknownColor(color))?;
        if trail.heading() == direction {
            return Ok(false);
        }

        let old = trail.reorient(direction);
        let cells = self.occupied.entry(color).or_default();
        cells.remove(&old);
        cells.insert(trail.head());
        Ok(true)
    }

    /// Advances every surviving trail by one unit.
    ///
    /// `intents` maps colors to wanted headings. A missing intent, an
    /// intent for an unknown color, or a reversal keeps the current
    /// heading. The wall check runs before the collision check, so a head
    /// that is both out of bounds and on an occupied cell is a wall loss.
    pub fn update(&mut self, intents: &HashMap<Color, Direction>) {
        self.started = true;

        for (&color, trail) in self.trails.iter_mut() {
            if self.losers.iter().any(|l| l.color == color) {
                continue;
            }

            let heading = trail.heading();
            let direction = match intents.get(&color) {
                Some(&wanted) if !wanted.is_opposite(heading) => wanted,
                _ => heading,
            };
            let next = trail.head().step(direction);

            if !self.bounds.contains(next) {
                tracing::debug!(%color, head = %next, "trail hit the wall");
                self.losers.push(Loser {
                    color,
                    obstacle: Obstacle::Wall,
                });
                continue;
            }

            if direction == heading {
                trail.advance(next);
            } else {
                trail.turn(next);
            }

            // The mover's own set still only holds earlier ticks here.
            let hit = self
                .occupied
                .iter()
                .find(|(_, cells)| cells.contains(&next))
                .map(|(&other, _)| other);

            match hit {
                Some(other) => {
                    tracing::debug!(%color, %other, head = %next, "trail collided");
                    self.losers.push(Loser {
                        color,
                        obstacle: Obstacle::Trail(other),
                    });
                }
                None => {
                    self.occupied.entry(color).or_default().insert(next);
                }
            }
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn trails(&self) -> &BTreeMap<Color, Trail> {
        &self.trails
    }

    pub fn trail(&self, color: Color) -> Option<&Trail> {
        self.trails.get(&color)
    }

    /// Eliminations in the order they happened.
    pub fn losers(&self) -> &[Loser] {
        &self.losers
    }

    pub fn is_eliminated(&self, color: Color) -> bool {
        self.losers.iter().any(|l| l.color == color)
    }

    /// Colors that have not been eliminated, in palette order.
    pub fn survivors(&self) -> Vec<Color> {
        self.trails
            .keys()
            .copied()
            .filter(|&c| !self.is_eliminated(c))
            .collect()
    }

    /// Returns `true` if `p` is covered by any trail.
    pub fn is_occupied(&self, p: Point) -> bool {
        self.occupied.values().any(|cells| cells.contains(&p))
    }

    /// An immutable copy of every trail, for broadcasting.
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            bounds: self.bounds,
            trails: self
                .trails
                .iter()
                .map(|(&color, trail)| (color, trail.points().to_vec()))
                .collect(),
        }
    }
}
