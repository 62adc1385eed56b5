//! Revolute linkages: two orthogonal links driven together, and the flexible
//! link that swings a ball-screw follower into place before it travels.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::instrument;

use super::{Labels, Link, LinkRole, Mechanism, MechanismPose};
use crate::drive::Drive;
use crate::error::{ensure_finite, ensure_positive, KinematicsError};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::curves::{linspace, Circle3d};
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::vector::Vec3;
use crate::law::DisplacementLaw;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthogonalLinkageParams {
    /// Link A, rotating in the XY plane (flexion/extension).
    pub length_a: f64,
    /// Link B, carried on A's tip and rotating in the XZ plane
    /// (abduction/adduction).
    pub length_b: f64,
    /// Angular rate of B relative to A.
    pub rate_ratio: f64,
    pub drive: Drive,
}

impl Default for OrthogonalLinkageParams {
    fn default() -> Self {
        Self {
            length_a: 1.0,
            length_b: 1.0,
            rate_ratio: 1.5,
            // 2 degrees per 50 ms frame, 180 frames.
            drive: Drive::new(2.0_f64.to_radians() / 0.05, 9.0, 0.05),
        }
    }
}

impl OrthogonalLinkageParams {
    pub fn validate(&self) -> Result<(), KinematicsError> {
        ensure_positive("length_a", self.length_a)?;
        ensure_positive("length_b", self.length_b)?;
        ensure_finite("rate_ratio", self.rate_ratio)?;
        self.drive.validate()
    }
}

#[derive(Debug, Clone)]
pub struct OrthogonalLinkage {
    params: OrthogonalLinkageParams,
}

impl OrthogonalLinkage {
    #[instrument]
    pub fn new(params: OrthogonalLinkageParams) -> Result<Self, KinematicsError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// `(theta_a, theta_b)` at a given time.
    pub fn joint_angles(&self, time: f64) -> (f64, f64) {
        let theta_a = self.params.drive.angle_at(time);
        (theta_a, self.params.rate_ratio * theta_a)
    }

    /// Height of B's end, as a law of time.
    fn elevation_law(&self) -> DisplacementLaw {
        DisplacementLaw::sinusoid(
            self.params.length_b,
            self.params.rate_ratio * self.params.drive.angular_velocity,
        )
    }
}

impl Mechanism for OrthogonalLinkage {
    fn name(&self) -> &'static str {
        "orthogonal-linkage"
    }

    fn title(&self) -> &'static str {
        "3D Orthogonal Linkage System"
    }

    fn labels(&self) -> Labels {
        Labels {
            driver: "Linkage A (Flex/Ext)",
            follower: "Linkage B (Ab/Ad)",
            connector: "",
            profile: "Linkage A Path",
        }
    }

    fn drive(&self) -> &Drive {
        &self.params.drive
    }

    fn pose(&self, time: f64) -> MechanismPose {
        let p = &self.params;
        let (theta_a, theta_b) = self.joint_angles(time);
        let a_tip = Point3d::on_circle(0.0, 0.0, p.length_a, theta_a, 0.0);
        let b_end = a_tip + Vec3::new(p.length_b * theta_b.cos(), 0.0, p.length_b * theta_b.sin());
        MechanismPose {
            time,
            angle: theta_a,
            driver_hub: Point3d::ORIGIN,
            driver_tip: a_tip,
            follower: b_end,
            displacement: b_end.z,
            connector: None,
            links: vec![
                Link::new(LinkRole::Primary, Point3d::ORIGIN, a_tip),
                Link::new(LinkRole::Secondary, a_tip, b_end),
            ],
        }
    }

    fn profile(&self, samples: usize) -> Vec<Point3d> {
        Circle3d::horizontal(Point3d::ORIGIN, self.params.length_a).sample(0.0, TAU, samples)
    }

    fn bounds(&self) -> BoundingBox {
        let half = 2.0_f64.max(self.params.length_a + self.params.length_b);
        BoundingBox::new(Point3d::new(-half, -half, -half), Point3d::new(half, half, half))
    }

    fn displacement_range(&self) -> (f64, f64) {
        let d = &self.params.drive;
        self.elevation_law().range(d.time_at(d.frame_count().saturating_sub(1)))
    }

    fn default_view(&self) -> (f64, f64) {
        (20.0, 30.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexLinkageParams {
    /// Fixed pivot of the flexible link, in the base plane.
    pub pivot: Point2d,
    /// X position of the ball screw, which runs along Y from 0.
    pub screw_x: f64,
    pub screw_length: f64,
    /// X position of the follower's guide.
    pub follower_x: f64,
    /// Radius of the follower's swing about the line through the pivot.
    pub swing_radius: f64,
    /// Total swing angle (rad); the drive's angular velocity sets its speed.
    pub swing_angle: f64,
    /// Distance travelled along the screw after the swing.
    pub travel: f64,
    /// Time taken by the travel phase (s).
    pub travel_duration: f64,
    pub drive: Drive,
}

impl Default for FlexLinkageParams {
    fn default() -> Self {
        Self {
            pivot: Point2d::new(1.0, 2.0),
            screw_x: 1.5,
            screw_length: 4.0,
            follower_x: 2.5,
            swing_radius: 1.0,
            swing_angle: FRAC_PI_2,
            travel: 4.0,
            travel_duration: 10.0,
            // 90 degrees over 100 frames of 100 ms, then 100 frames of travel.
            drive: Drive::new(FRAC_PI_2 / 10.0, 20.0, 0.1),
        }
    }
}

impl FlexLinkageParams {
    pub fn validate(&self) -> Result<(), KinematicsError> {
        ensure_finite("pivot.x", self.pivot.x)?;
        ensure_finite("pivot.y", self.pivot.y)?;
        ensure_finite("screw_x", self.screw_x)?;
        ensure_positive("screw_length", self.screw_length)?;
        ensure_finite("follower_x", self.follower_x)?;
        ensure_positive("swing_radius", self.swing_radius)?;
        ensure_positive("swing_angle", self.swing_angle)?;
        ensure_positive("travel", self.travel)?;
        ensure_positive("travel_duration", self.travel_duration)?;
        ensure_positive("angular_velocity", self.drive.angular_velocity)?;
        self.drive.validate()
    }
}

/// Which part of the flex-link motion is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexPhase {
    Swing,
    Travel,
}

#[derive(Debug, Clone)]
pub struct FlexLinkage {
    params: FlexLinkageParams,
}

impl FlexLinkage {
    #[instrument]
    pub fn new(params: FlexLinkageParams) -> Result<Self, KinematicsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn swing_duration(&self) -> f64 {
        self.params.swing_angle / self.params.drive.angular_velocity
    }

    pub fn phase_at(&self, time: f64) -> FlexPhase {
        if time < self.swing_duration() - 1e-9 {
            FlexPhase::Swing
        } else {
            FlexPhase::Travel
        }
    }

    /// Circle the follower swings on: around the X-parallel line through the
    /// pivot height, starting straight up.
    pub fn swing_circle(&self) -> Circle3d {
        let p = &self.params;
        Circle3d::with_axes(
            Point3d::new(p.follower_x, p.pivot.y, 0.0),
            Vec3::Z,
            Vec3::Y,
            p.swing_radius,
        )
    }

    fn pivot(&self) -> Point3d {
        Point3d::new(self.params.pivot.x, self.params.pivot.y, 0.0)
    }
}

impl Mechanism for FlexLinkage {
    fn name(&self) -> &'static str {
        "flex-linkage"
    }

    fn title(&self) -> &'static str {
        "Flexible Linkage Mechanism for Ball Screw Follower"
    }

    fn labels(&self) -> Labels {
        Labels {
            driver: "Linkage",
            follower: "Follower",
            connector: "",
            profile: "Ball Screw",
        }
    }

    fn drive(&self) -> &Drive {
        &self.params.drive
    }

    fn pose(&self, time: f64) -> MechanismPose {
        let p = &self.params;
        let circle = self.swing_circle();
        let (angle, follower) = match self.phase_at(time) {
            FlexPhase::Swing => {
                let angle = p.drive.angle_at(time);
                (angle, circle.evaluate(angle))
            }
            FlexPhase::Travel => {
                let s = ((time - self.swing_duration()) / p.travel_duration).clamp(0.0, 1.0);
                (p.swing_angle, Point3d::new(p.follower_x, p.travel * s, 0.0))
            }
        };
        let pivot = self.pivot();
        MechanismPose {
            time,
            angle,
            driver_hub: circle.center,
            driver_tip: follower,
            follower,
            displacement: follower.y,
            connector: None,
            links: vec![
                Link::new(LinkRole::Fixed, Point3d::new(p.screw_x, p.pivot.y, 0.0), pivot),
                Link::new(LinkRole::Primary, pivot, follower),
            ],
        }
    }

    /// The screw, a straight line along Y.
    fn profile(&self, samples: usize) -> Vec<Point3d> {
        let p = &self.params;
        linspace(0.0, p.screw_length, samples.max(2))
            .map(|y| Point3d::new(p.screw_x, y, 0.0))
            .collect()
    }

    fn bounds(&self) -> BoundingBox {
        let p = &self.params;
        let x_lo = p.pivot.x.min(p.screw_x).min(p.follower_x) - 1.0;
        let x_hi = p.pivot.x.max(p.screw_x).max(p.follower_x) + 1.0;
        let y_hi = p.screw_length.max(p.travel).max(p.pivot.y + p.swing_radius) + 0.5;
        BoundingBox::new(
            Point3d::new(x_lo, -0.5, -p.swing_radius),
            Point3d::new(x_hi, y_hi, p.swing_radius),
        )
    }

    fn displacement_range(&self) -> (f64, f64) {
        self.drive()
            .frames()
            .map(|(_, t)| self.pose(t).displacement)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)))
    }

    fn default_view(&self) -> (f64, f64) {
        (20.0, 30.0)
    }
}
