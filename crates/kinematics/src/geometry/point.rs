use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::vector::Vec3;

/// A point in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point on a circle of `radius` around the vertical axis through
    /// `(axis_x, axis_y)`, lifted to height `z`.
    pub fn on_circle(axis_x: f64, axis_y: f64, radius: f64, angle: f64, z: f64) -> Self {
        Self {
            x: axis_x + radius * angle.cos(),
            y: axis_y + radius * angle.sin(),
            z,
        }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Distance from the vertical axis through `(axis_x, axis_y)`.
    pub fn radial_distance(&self, axis_x: f64, axis_y: f64) -> f64 {
        let dx = self.x - axis_x;
        let dy = self.y - axis_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Same x/y, different height.
    pub fn with_z(&self, z: f64) -> Self {
        Self { z, ..*self }
    }

    /// Projection onto the base plane (z = 0).
    pub fn grounded(&self) -> Self {
        self.with_z(0.0)
    }

    pub fn xy(&self) -> Point2d {
        Point2d::new(self.x, self.y)
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A point in 2D space (plot coordinates, pivot locations).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_on_circle_quarter_turn() {
        let p = Point3d::on_circle(1.0, 0.0, 2.0, FRAC_PI_2, 5.0);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert!((p.z - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_radial_distance_ignores_height() {
        let p = Point3d::new(3.0, 4.0, 100.0);
        assert!((p.radial_distance(0.0, 0.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_sub_gives_vector() {
        let a = Point3d::new(3.0, 4.0, 5.0);
        let b = Point3d::new(1.0, 1.0, 1.0);
        let v = a - b;
        assert_eq!(v, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_grounded_keeps_xy() {
        let p = Point3d::new(2.5, -1.0, 3.0).grounded();
        assert_eq!(p, Point3d::new(2.5, -1.0, 0.0));
    }
}
