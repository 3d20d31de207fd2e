//! Read-only copies of the arena for viewers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Bounds, Color, Point};

/// Every trail at one instant, in arena coordinates.
///
/// Snapshots are full state, not deltas: a viewer that misses some can
/// render any later one on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArenaSnapshot {
    pub bounds: Bounds,
    pub trails: BTreeMap<Color, Vec<Point>>,
}

impl ArenaSnapshot {
    /// The same trails with `y` measured from the top edge, which is how
    /// display canvases count.
    pub fn flipped(&self) -> BTreeMap<Color, Vec<Point>> {
        let height = self.bounds.height;
        self.trails
            .iter()
            .map(|(&color, points)| {
                let flipped = points
                    .iter()
                    .map(|p| Point::new(p.x, height - p.y))
                    .collect();
                (color, flipped)
            })
            .collect()
    }
}
