use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::Vec3;

/// A straight segment between two points (a link, a rod, a connector).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment3d {
    pub start: Point3d,
    pub end: Point3d,
}

impl Segment3d {
    pub const fn new(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn points(&self) -> [Point3d; 2] {
        [self.start, self.end]
    }
}

/// A circle in 3D space, parametrized by angle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Circle3d {
    pub center: Point3d,
    pub radius: f64,
    /// Direction of angle zero.
    pub x_axis: Vec3,
    /// Direction of angle pi/2.
    pub y_axis: Vec3,
}

impl Circle3d {
    /// Circle in a plane parallel to XY.
    pub fn horizontal(center: Point3d, radius: f64) -> Self {
        Self::with_axes(center, Vec3::X, Vec3::Y, radius)
    }

    pub fn with_axes(center: Point3d, x_axis: Vec3, y_axis: Vec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            x_axis,
            y_axis,
        }
    }

    /// Evaluate at angle t (radians).
    pub fn evaluate(&self, t: f64) -> Point3d {
        self.center + self.x_axis * (self.radius * t.cos()) + self.y_axis * (self.radius * t.sin())
    }

    pub fn sample(&self, t0: f64, t1: f64, samples: usize) -> Vec<Point3d> {
        linspace(t0, t1, samples).map(|t| self.evaluate(t)).collect()
    }
}

/// A helix around a vertical axis: rises `pitch` per full turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Helix3d {
    pub axis: Point2d,
    pub radius: f64,
    pub pitch: f64,
}

impl Helix3d {
    pub fn new(axis: Point2d, radius: f64, pitch: f64) -> Self {
        Self {
            axis,
            radius,
            pitch,
        }
    }

    pub fn height_at(&self, angle: f64) -> f64 {
        self.pitch * angle / std::f64::consts::TAU
    }

    pub fn evaluate(&self, angle: f64) -> Point3d {
        Point3d::on_circle(self.axis.x, self.axis.y, self.radius, angle, self.height_at(angle))
    }

    /// Sample `turns` full turns starting at angle zero.
    pub fn sample(&self, turns: f64, samples: usize) -> Vec<Point3d> {
        linspace(0.0, std::f64::consts::TAU * turns, samples)
            .map(|t| self.evaluate(t))
            .collect()
    }
}

/// `samples` evenly spaced values over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, samples: usize) -> impl Iterator<Item = f64> {
    let steps = samples.saturating_sub(1).max(1) as f64;
    (0..samples).map(move |i| start + (end - start) * (i as f64 / steps))
}
