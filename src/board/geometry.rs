use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile coordinate. Ordered by x, then y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        GridPoint { x, y }
    }

    pub fn offset(self, vector: MoveVector) -> GridPoint {
        GridPoint::new(self.x + vector.dx, self.y + vector.dy)
    }

    /// Sort key for row-major order (y first, then x)
    pub fn row_major_key(self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Relative displacement; positive dy points up the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoveVector {
    pub dx: i32,
    pub dy: i32,
}

impl MoveVector {
    pub const fn new(dx: i32, dy: i32) -> Self {
        MoveVector { dx, dy }
    }

    pub fn between(from: GridPoint, to: GridPoint) -> Self {
        MoveVector::new(to.x - from.x, to.y - from.y)
    }
}

/// Board-size arithmetic shared by every square board
pub struct BoardGeometry;

impl BoardGeometry {
    pub const STANDARD_SIZE: usize = 5;

    /// Board center; even sizes round down
    pub fn default_spawn(size: usize) -> GridPoint {
        let center = (size.saturating_sub(1) / 2) as i32;
        GridPoint::new(center, center)
    }

    /// Every point of a board in row-major order
    pub fn all_points(size: usize) -> Vec<GridPoint> {
        let side = size as i32;
        let mut points = Vec::with_capacity(size * size);
        for y in 0..side {
            for x in 0..side {
                points.push(GridPoint::new(x, y));
            }
        }
        points
    }

    pub fn contains(size: usize, point: GridPoint) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as usize) < size && (point.y as usize) < size
    }

    /// Row-major index of an in-bounds point
    pub fn index_of(size: usize, point: GridPoint) -> Option<usize> {
        if Self::contains(size, point) {
            Some(point.y as usize * size + point.x as usize)
        } else {
            None
        }
    }
}
