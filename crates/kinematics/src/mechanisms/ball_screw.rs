//! Ball screw driving a nut along a parallel guide.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{offset_axis_bounds, Labels, Link, LinkRole, Mechanism, MechanismPose};
use crate::drive::Drive;
use crate::error::{ensure_finite, ensure_positive, KinematicsError};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::curves::{Helix3d, Segment3d};
use crate::geometry::point::{Point2d, Point3d};
use crate::law::DisplacementLaw;

/// Screw geometry (centimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallScrewParams {
    pub radius: f64,
    /// Nut travel per screw revolution.
    pub pitch: f64,
    /// Thread length in turns.
    pub turns: f64,
    /// X position of the screw's rotation axis.
    pub screw_offset_x: f64,
    /// X position of the nut's guide, parallel to the screw axis.
    pub follower_offset_x: f64,
    pub drive: Drive,
}

impl Default for BallScrewParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            pitch: 2.5,
            turns: 2.0,
            screw_offset_x: 0.0,
            follower_offset_x: 2.5,
            drive: Drive::default(),
        }
    }
}

impl BallScrewParams {
    /// Single-turn screw used with the half-turn dwell.
    pub fn single_turn() -> Self {
        Self {
            turns: 1.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), KinematicsError> {
        ensure_positive("radius", self.radius)?;
        ensure_positive("pitch", self.pitch)?;
        ensure_positive("turns", self.turns)?;
        ensure_finite("screw_offset_x", self.screw_offset_x)?;
        ensure_finite("follower_offset_x", self.follower_offset_x)?;
        self.drive.validate()
    }

    /// Thread height.
    pub fn height(&self) -> f64 {
        self.turns * self.pitch
    }
}

#[derive(Debug, Clone)]
pub struct BallScrew {
    params: BallScrewParams,
    law: DisplacementLaw,
    dwell: bool,
}

impl BallScrew {
    /// Nut follows the thread: one pitch of travel per revolution.
    #[instrument]
    pub fn new(params: BallScrewParams) -> Result<Self, KinematicsError> {
        params.validate()?;
        debug!(height = params.height(), "ball screw ready");
        Ok(Self {
            params,
            law: DisplacementLaw::linear(params.pitch),
            dwell: false,
        })
    }

    /// Nut rests for the first half turn, then travels one pitch by the end
    /// of the turn.
    #[instrument]
    pub fn with_dwell(params: BallScrewParams) -> Result<Self, KinematicsError> {
        params.validate()?;
        let law = DisplacementLaw::half_turn_dwell(params.pitch);
        debug!(stroke = params.pitch, "ball screw with dwell ready");
        Ok(Self {
            params,
            law,
            dwell: true,
        })
    }

    pub fn params(&self) -> &BallScrewParams {
        &self.params
    }

    pub fn law(&self) -> &DisplacementLaw {
        &self.law
    }

    /// Nut height for a screw rotation angle.
    pub fn nut_height(&self, angle: f64) -> f64 {
        self.law.displacement(angle)
    }

    fn thread(&self) -> Helix3d {
        Helix3d::new(
            Point2d::new(self.params.screw_offset_x, 0.0),
            self.params.radius,
            self.params.pitch,
        )
    }
}

impl Mechanism for BallScrew {
    fn name(&self) -> &'static str {
        if self.dwell { "ball-screw-dwell" } else { "ball-screw" }
    }

    fn title(&self) -> &'static str {
        if self.dwell {
            "Ball Screw with Half-Turn Dwell"
        } else {
            "Ball Screw and Nut"
        }
    }

    fn labels(&self) -> Labels {
        Labels {
            driver: "Ball Screw",
            follower: if self.dwell { "Follower" } else { "Nut" },
            connector: if self.dwell { "Follower Line" } else { "Nut Line" },
            profile: "Helical Screw Groove",
        }
    }

    fn drive(&self) -> &Drive {
        &self.params.drive
    }

    fn pose(&self, time: f64) -> MechanismPose {
        let p = &self.params;
        let angle = p.drive.angle_at(time);
        let z = self.nut_height(angle);
        // The arm is drawn at the nut's height so the connector stays level.
        let driver_tip = Point3d::on_circle(p.screw_offset_x, 0.0, p.radius, angle, z);
        let follower = Point3d::new(p.follower_offset_x, 0.0, z);
        MechanismPose {
            time,
            angle,
            driver_hub: Point3d::new(p.screw_offset_x, 0.0, z),
            driver_tip,
            follower,
            displacement: z,
            connector: Some(Segment3d::new(driver_tip, follower)),
            links: vec![Link::new(LinkRole::Rod, follower, follower.grounded())],
        }
    }

    fn profile(&self, samples: usize) -> Vec<Point3d> {
        self.thread().sample(self.params.turns, samples)
    }

    fn bounds(&self) -> BoundingBox {
        let (bottom, top) = self.displacement_range();
        let z_max = if self.dwell {
            self.params.height() + self.params.pitch
        } else {
            self.params.height().max(top)
        };
        // A reversed drive winds the nut below the base of the thread.
        offset_axis_bounds(
            self.params.screw_offset_x,
            self.params.follower_offset_x,
            bottom.min(0.0),
            z_max,
        )
    }

    fn displacement_range(&self) -> (f64, f64) {
        self.law.range(self.params.drive.final_angle())
    }
}
