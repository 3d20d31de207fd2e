//! Geometry primitives shared by the arena, the game and the wire format.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A player's identity inside one game.
///
/// The palette is fixed and ordered: when a game hands out colors it
/// always picks the first one not yet taken, in the order of
/// [`Color::PALETTE`]. `Ord` follows the same order, which is also the
/// order the arena processes players within a tick.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
    Green,
    Orange,
    Black,
    Purple,
}

impl Color {
    /// Every assignable color, in assignment order.
    pub const PALETTE: [Color; 6] = [
        Color::Blue,
        Color::Red,
        Color::Green,
        Color::Orange,
        Color::Black,
        Color::Purple,
    ];

    /// The wire name of this color.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Black => "black",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Obstacle
// ---------------------------------------------------------------------------

/// What a losing head ran into.
///
/// The wall is not a [`Color`], so it can never be handed
/// to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Obstacle {
    /// The arena boundary.
    Wall,
    /// The trail of the given color (possibly the loser's own).
    Trail(Color),
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wall => f.write_str("wall"),
            Self::Trail(color) => write!(f, "{color} trail"),
        }
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A heading on the arena plane. `Up` increases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "u", alias = "up")]
    Up,
    #[serde(rename = "d", alias = "down")]
    Down,
    #[serde(rename = "l", alias = "left")]
    Left,
    #[serde(rename = "r", alias = "right")]
    Right,
}

impl Direction {
    /// The reverse heading on the same axis.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` if `self` and `other` are reverses of each other.
    pub fn is_opposite(self, other: Self) -> bool {
        self.opposite() == other
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell on the arena plane.
///
/// Spawns are integral and every move is one unit, so integer coordinates
/// are exact and give us `Eq + Hash` for the occupancy index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one unit along `direction`.
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y + 1),
            Direction::Down => Self::new(self.x, self.y - 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
