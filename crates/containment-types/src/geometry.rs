//! Map geometry.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point on the 2D world map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MapPos {
    /// Horizontal map coordinate.
    pub x: f32,
    /// Vertical map coordinate.
    pub y: f32,
}

impl MapPos {
    /// Construct a position from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared straight-line distance to `other`.
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Straight-line distance to `other`.
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = MapPos::new(0.0, 0.0);
        let b = MapPos::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!((a.distance_squared(b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = MapPos::new(-2.5, 1.0);
        let b = MapPos::new(4.0, -3.0);
        assert!((a.distance(b) - b.distance(a)).abs() < 1e-6);
    }
}
