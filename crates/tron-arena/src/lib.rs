//! Arena simulation for light-cycle matches.
//!
//! An [`Arena`] holds one [`Trail`] per player color and advances all of
//! them by one unit step per tick, recording a [`Loser`] whenever a head
//! leaves the open bounds or lands on a cell some trail already occupies.
//!
//! The arena is plain data with no synchronization: a single game worker
//! owns it for the whole match and shares only [`ArenaSnapshot`]s.
//!
//! # Key types
//!
//! - [`Color`], [`Direction`], [`Point`], [`Obstacle`]: geometry primitives
//! - [`Trail`]: polyline of corners plus the live head
//! - [`Arena`]: trails, occupancy index and the loser list
//! - [`ArenaSnapshot`]: immutable copy broadcast to viewers

mod arena;
mod error;
mod geometry;
mod snapshot;

pub use arena::{Arena, Bounds, Loser, Trail};
pub use error::ArenaError;
pub use geometry::{Color, Direction, Obstacle, Point};
pub use snapshot::ArenaSnapshot;
