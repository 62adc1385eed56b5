//! Cam mechanisms: a cylindrical cam with a grooved surface, and a disc cam
//! pushing a follower along its rotation axis.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, instrument};

use super::{offset_axis_bounds, Labels, Link, LinkRole, Mechanism, MechanismPose, PLOT_MARGIN};
use crate::drive::Drive;
use crate::error::{ensure_finite, ensure_positive, KinematicsError};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::curves::{linspace, Segment3d};
use crate::geometry::point::Point3d;
use crate::law::DisplacementLaw;

/// Height at which the rotating cam arm is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmHeight {
    /// Arm rides at the follower's height, on the groove.
    Follower,
    /// Arm stays on the base plane.
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylindricalCamParams {
    pub radius: f64,
    /// Groove length in turns.
    pub turns: f64,
    /// Groove shape as a function of cam angle.
    pub law: DisplacementLaw,
    pub cam_offset_x: f64,
    pub follower_offset_x: f64,
    pub arm: ArmHeight,
    /// Draw a push rod under the follower.
    pub rod: bool,
    pub drive: Drive,
}

impl Default for CylindricalCamParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            turns: 3.0,
            law: DisplacementLaw::linear(1.0),
            cam_offset_x: 0.0,
            follower_offset_x: 3.0,
            arm: ArmHeight::Follower,
            rod: false,
            drive: Drive {
                angular_velocity: TAU / 5.0,
                ..Drive::default()
            },
        }
    }
}

impl CylindricalCamParams {
    /// Single-turn cam whose groove is flat for 180 degrees and then climbs
    /// 2.5 cm.
    pub fn dwell() -> Self {
        Self {
            radius: 1.0,
            turns: 1.0,
            law: DisplacementLaw::half_turn_dwell(2.5),
            follower_offset_x: 2.5,
            arm: ArmHeight::Base,
            rod: true,
            drive: Drive::default(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), KinematicsError> {
        ensure_positive("radius", self.radius)?;
        ensure_positive("turns", self.turns)?;
        ensure_finite("cam_offset_x", self.cam_offset_x)?;
        ensure_finite("follower_offset_x", self.follower_offset_x)?;
        self.law.validate()?;
        self.drive.validate()
    }
}

/// Cylindrical cam whose groove lifts a follower on a parallel guide.
#[derive(Debug, Clone)]
pub struct CylindricalCam {
    params: CylindricalCamParams,
}

impl CylindricalCam {
    #[instrument]
    pub fn new(params: CylindricalCamParams) -> Result<Self, KinematicsError> {
        params.validate()?;
        if let DisplacementLaw::Sinusoid { .. } = params.law {
            return Err(KinematicsError::UnsupportedLaw {
                mechanism: "cylindrical cam",
                law: params.law.kind_name(),
            });
        }
        debug!(law = params.law.kind_name(), "cylindrical cam ready");
        Ok(Self { params })
    }

    pub fn params(&self) -> &CylindricalCamParams {
        &self.params
    }

    fn is_dwell(&self) -> bool {
        matches!(self.params.law, DisplacementLaw::DwellRise { .. })
    }

    /// Point of the groove at a cam angle.
    pub fn groove_point(&self, angle: f64) -> Point3d {
        let p = &self.params;
        Point3d::on_circle(p.cam_offset_x, 0.0, p.radius, angle, p.law.displacement(angle))
    }
}

impl Mechanism for CylindricalCam {
    fn name(&self) -> &'static str {
        if self.is_dwell() { "cam-dwell" } else { "cam-planar" }
    }

    fn title(&self) -> &'static str {
        if self.is_dwell() {
            "Cylindrical Cam with 180° Dwell"
        } else {
            "Cylindrical Cam with Helical Groove"
        }
    }

    fn labels(&self) -> Labels {
        Labels {
            driver: "Cam",
            follower: "Follower",
            connector: "Follower Line",
            profile: "Helical Groove",
        }
    }

    fn drive(&self) -> &Drive {
        &self.params.drive
    }

    fn pose(&self, time: f64) -> MechanismPose {
        let p = &self.params;
        let angle = p.drive.angle_at(time);
        let z = p.law.displacement(angle);
        let arm_z = match p.arm {
            ArmHeight::Follower => z,
            ArmHeight::Base => 0.0,
        };
        let driver_tip = Point3d::on_circle(p.cam_offset_x, 0.0, p.radius, angle, arm_z);
        let follower = Point3d::new(p.follower_offset_x, 0.0, z);
        let mut links = Vec::new();
        if p.rod {
            links.push(Link::new(LinkRole::Rod, follower, follower.grounded()));
        }
        MechanismPose {
            time,
            angle,
            driver_hub: Point3d::new(p.cam_offset_x, 0.0, arm_z),
            driver_tip,
            follower,
            displacement: z,
            connector: Some(Segment3d::new(driver_tip, follower)),
            links,
        }
    }

    fn profile(&self, samples: usize) -> Vec<Point3d> {
        linspace(0.0, TAU * self.params.turns, samples)
            .map(|angle| self.groove_point(angle))
            .collect()
    }

    fn bounds(&self) -> BoundingBox {
        let p = &self.params;
        // Hold the groove as drawn and the run, which may reverse or overrun it.
        let (groove_lo, groove_hi) = p.law.range(TAU * p.turns);
        let (run_lo, run_hi) = self.displacement_range();
        offset_axis_bounds(
            p.cam_offset_x,
            p.follower_offset_x,
            groove_lo.min(run_lo).min(0.0),
            groove_hi.max(run_hi),
        )
    }

    fn displacement_range(&self) -> (f64, f64) {
        self.params.law.range(self.params.drive.final_angle())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscCamParams {
    /// Radius of the cam's base circle.
    pub base_radius: f64,
    /// Peak follower travel either side of rest.
    pub amplitude: f64,
    pub drive: Drive,
}

impl Default for DiscCamParams {
    fn default() -> Self {
        Self {
            base_radius: 2.0,
            amplitude: 1.0,
            // One revolution per second.
            drive: Drive {
                angular_velocity: TAU,
                ..Drive::default()
            },
        }
    }
}

impl DiscCamParams {
    pub fn validate(&self) -> Result<(), KinematicsError> {
        ensure_positive("base_radius", self.base_radius)?;
        ensure_positive("amplitude", self.amplitude)?;
        ensure_positive("angular_velocity", self.drive.angular_velocity)?;
        self.drive.validate()
    }
}

/// Disc cam with a one-lobe sinusoidal contour; the follower sits on the
/// rotation axis and moves perpendicular to the cam plane.
#[derive(Debug, Clone)]
pub struct DiscCam {
    params: DiscCamParams,
    law: DisplacementLaw,
}

impl DiscCam {
    #[instrument]
    pub fn new(params: DiscCamParams) -> Result<Self, KinematicsError> {
        params.validate()?;
        Ok(Self {
            params,
            law: DisplacementLaw::sinusoid(params.amplitude, params.drive.angular_velocity),
        })
    }

    pub fn law(&self) -> &DisplacementLaw {
        &self.law
    }

    /// Point of the cam contour touching the follower's line of action.
    pub fn contact_point(&self, time: f64) -> Point3d {
        let angle = self.params.drive.angle_at(time);
        let r = self.params.base_radius + self.law.displacement(time);
        Point3d::on_circle(0.0, 0.0, r, angle, 0.0)
    }
}

impl Mechanism for DiscCam {
    fn name(&self) -> &'static str {
        "cam-orthogonal"
    }

    fn title(&self) -> &'static str {
        "Disc Cam with Orthogonal Follower"
    }

    fn labels(&self) -> Labels {
        Labels {
            driver: "Cam",
            follower: "Follower",
            connector: "Follower Line",
            profile: "Cam Profile",
        }
    }

    fn drive(&self) -> &Drive {
        &self.params.drive
    }

    fn pose(&self, time: f64) -> MechanismPose {
        let angle = self.params.drive.angle_at(time);
        let displacement = self.law.displacement(time);
        let follower = Point3d::new(0.0, 0.0, displacement);
        MechanismPose {
            time,
            angle,
            driver_hub: Point3d::ORIGIN,
            driver_tip: Point3d::on_circle(0.0, 0.0, self.params.base_radius, angle, 0.0),
            follower,
            displacement,
            connector: Some(Segment3d::new(self.contact_point(time), follower)),
            links: Vec::new(),
        }
    }

    fn profile(&self, samples: usize) -> Vec<Point3d> {
        let p = &self.params;
        linspace(0.0, TAU, samples)
            .map(|phi| Point3d::on_circle(0.0, 0.0, p.base_radius + p.amplitude * phi.sin(), phi, 0.0))
            .collect()
    }

    fn bounds(&self) -> BoundingBox {
        let p = &self.params;
        let half = PLOT_MARGIN.max(p.base_radius + p.amplitude);
        let depth = p.amplitude + 0.5;
        BoundingBox::new(Point3d::new(-half, -half, -depth), Point3d::new(half, half, depth))
    }

    fn displacement_range(&self) -> (f64, f64) {
        let d = &self.params.drive;
        self.law.range(d.time_at(d.frame_count().saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_planar_cam_follows_helix() {
        let cam = CylindricalCam::new(CylindricalCamParams::default()).unwrap();
        assert_eq!(cam.name(), "cam-planar");
        // omega = 2pi/5: one turn every 5 s lifts one pitch.
        let pose = cam.pose(5.0);
        assert_relative_eq!(pose.displacement, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.driver_tip.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.follower.x, 3.0);
        assert!(pose.links.is_empty());
    }

    #[test]
    fn test_dwell_cam_arm_on_base() {
        let cam = CylindricalCam::new(CylindricalCamParams::dwell()).unwrap();
        assert_eq!(cam.name(), "cam-dwell");
        let pose = cam.pose(8.0);
        assert_eq!(pose.driver_tip.z, 0.0);
        assert!(pose.follower.z > 0.0);
        assert!(pose.link(LinkRole::Rod).is_some());
    }

    #[test]
    fn test_dwell_groove_flat_for_half_turn() {
        let cam = CylindricalCam::new(CylindricalCamParams::dwell()).unwrap();
        for p in cam.profile(1000) {
            let angle = p.y.atan2(p.x).rem_euclid(TAU);
            if angle < PI - 1e-6 && p.y > 1e-9 {
                assert_eq!(p.z, 0.0);
            }
        }
        assert_relative_eq!(cam.groove_point(TAU).z, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_cylindrical_cam_bounds_hold_reversed_and_long_runs() {
        for angular_velocity in [-TAU / 5.0, TAU] {
            let cam = CylindricalCam::new(CylindricalCamParams {
                drive: Drive::new(angular_velocity, 10.0, 0.05),
                ..CylindricalCamParams::default()
            })
            .unwrap();
            let bb = cam.bounds();
            for (i, _) in cam.drive().frames() {
                let pose = cam.pose_at_frame(i);
                assert!(bb.contains(&pose.follower, 1e-9), "{angular_velocity}: {:?} outside {bb:?}", pose.follower);
                assert!(bb.contains(&pose.driver_tip, 1e-9));
            }
            // The full groove stays in view as well.
            assert!(cam.profile(200).iter().all(|p| bb.contains(p, 1e-9)));
        }
    }

    #[test]
    fn test_cylindrical_cam_rejects_sinusoid() {
        let params = CylindricalCamParams {
            law: DisplacementLaw::sinusoid(1.0, 1.0),
            ..CylindricalCamParams::default()
        };
        assert!(matches!(
            CylindricalCam::new(params),
            Err(KinematicsError::UnsupportedLaw { .. })
        ));
    }

    #[test]
    fn test_disc_cam_displacement() {
        let cam = DiscCam::new(DiscCamParams::default()).unwrap();
        assert_eq!(cam.pose(0.0).displacement, 0.0);
        assert_relative_eq!(cam.pose(0.25).displacement, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cam.pose(0.25).follower.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_disc_cam_contact_on_profile() {
        let cam = DiscCam::new(DiscCamParams::default()).unwrap();
        let contact = cam.contact_point(0.25);
        assert_relative_eq!(contact.radial_distance(0.0, 0.0), 3.0, epsilon = 1e-12);
        let tip = cam.pose(0.25).driver_tip;
        assert_relative_eq!(tip.radial_distance(0.0, 0.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_disc_cam_range_and_bounds() {
        let cam = DiscCam::new(DiscCamParams::default()).unwrap();
        assert_eq!(cam.displacement_range(), (-1.0, 1.0));
        let bb = cam.bounds();
        for p in cam.profile(100) {
            assert!(bb.contains(&p, 1e-9));
        }
    }
}
