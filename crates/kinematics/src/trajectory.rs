//! Append-only history of a run.

use serde::{Deserialize, Serialize};

use crate::geometry::point::{Point2d, Point3d};
use crate::mechanisms::MechanismPose;

/// The parts of a pose that are traced over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub angle: f64,
    /// Tip of the driving element.
    pub driver: Point3d,
    pub follower: Point3d,
    pub displacement: f64,
}

impl From<&MechanismPose> for TrajectorySample {
    fn from(pose: &MechanismPose) -> Self {
        Self {
            time: pose.time,
            angle: pose.angle,
            driver: pose.driver_tip,
            follower: pose.follower,
            displacement: pose.displacement,
        }
    }
}

/// Samples in the order they were recorded. Nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }

    pub fn record(&mut self, pose: &MechanismPose) {
        self.push(TrajectorySample::from(pose));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    /// Path of the driver tip projected on the base plane.
    pub fn driver_xy(&self) -> impl Iterator<Item = Point2d> + '_ {
        self.samples.iter().map(|s| s.driver.xy())
    }

    pub fn driver_path(&self) -> impl Iterator<Item = Point3d> + '_ {
        self.samples.iter().map(|s| s.driver)
    }

    /// `(time, displacement)` pairs.
    pub fn displacements(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(|s| (s.time, s.displacement))
    }
}
