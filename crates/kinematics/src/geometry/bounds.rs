use serde::{Deserialize, Serialize};

use super::point::Point3d;

/// Axis-aligned box used as the plot volume of a mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: &Point3d, tolerance: f64) -> bool {
        p.x >= self.min.x - tolerance
            && p.x <= self.max.x + tolerance
            && p.y >= self.min.y - tolerance
            && p.y <= self.max.y + tolerance
            && p.z >= self.min.z - tolerance
            && p.z <= self.max.z + tolerance
    }

    /// The eight corners, bottom face first.
    pub fn corners(&self) -> [Point3d; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3d::new(a.x, a.y, a.z),
            Point3d::new(b.x, a.y, a.z),
            Point3d::new(b.x, b.y, a.z),
            Point3d::new(a.x, b.y, a.z),
            Point3d::new(a.x, a.y, b.z),
            Point3d::new(b.x, a.y, b.z),
            Point3d::new(b.x, b.y, b.z),
            Point3d::new(a.x, b.y, b.z),
        ]
    }

    /// Index pairs into [`corners`](Self::corners) forming the twelve edges.
    pub const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
}
