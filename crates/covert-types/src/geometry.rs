//! Grid coordinates and directions.

use serde::{Deserialize, Serialize};

/// A tile coordinate on the level grid.
///
/// Coordinates are signed so that neighbor arithmetic near the map edge
/// produces an out-of-bounds point instead of wrapping; the grid rejects
/// such points on lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row (grows downward).
    pub y: i32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Return the neighbor one step in `direction`.
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// The four cardinal neighbors, in N, E, S, W order.
    pub const fn cardinal_neighbors(self) -> [Self; 4] {
        [
            self.step(Direction::North),
            self.step(Direction::East),
            self.step(Direction::South),
            self.step(Direction::West),
        ]
    }

    /// All eight neighbors, cardinal first, then diagonal.
    pub const fn all_neighbors(self) -> [Self; 8] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, -1),
            self.offset(1, 1),
            self.offset(-1, 1),
            self.offset(-1, -1),
        ]
    }

    /// Chebyshev (king-move) distance, the tile distance used for vision
    /// range and explosion rings.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Manhattan distance.
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

impl core::fmt::Display for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cardinal facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Up (negative y).
    North,
    /// Right (positive x).
    East,
    /// Down (positive y).
    South,
    /// Left (negative x).
    West,
}

impl Direction {
    /// Unit step `(dx, dy)` for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}
