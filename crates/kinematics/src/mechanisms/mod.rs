//! The mechanism variants and the per-frame pose record they produce.

pub mod ball_screw;
pub mod cam;
pub mod linkage;

use serde::Serialize;

use crate::drive::Drive;
use crate::geometry::bounds::BoundingBox;
use crate::geometry::curves::Segment3d;
use crate::geometry::point::Point3d;

pub use ball_screw::{BallScrew, BallScrewParams};
pub use cam::{ArmHeight, CylindricalCam, CylindricalCamParams, DiscCam, DiscCamParams};
pub use linkage::{FlexLinkage, FlexLinkageParams, OrthogonalLinkage, OrthogonalLinkageParams};

/// Half-width of the plot volume around the driving axis, and the padding
/// past the follower axis.
pub const PLOT_MARGIN: f64 = 2.5;

/// What an auxiliary segment in a pose represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRole {
    /// Push rod from the follower down to the base plane.
    Rod,
    /// First revolute link of a linkage.
    Primary,
    /// Second revolute link, carried by the first.
    Secondary,
    /// Link that does not move during the run.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Link {
    pub role: LinkRole,
    pub segment: Segment3d,
}

impl Link {
    pub fn new(role: LinkRole, start: Point3d, end: Point3d) -> Self {
        Self {
            role,
            segment: Segment3d::new(start, end),
        }
    }
}

/// Complete geometric state of a mechanism at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanismPose {
    pub time: f64,
    /// Rotation angle of the driving element (rad).
    pub angle: f64,
    /// Point on the rotation axis the driver arm starts from.
    pub driver_hub: Point3d,
    /// Tip of the driver arm. Stays on a circle around the hub axis.
    pub driver_tip: Point3d,
    pub follower: Point3d,
    /// Follower travel along its axis.
    pub displacement: f64,
    /// Line from the driving element to the follower, if the mechanism draws one.
    pub connector: Option<Segment3d>,
    pub links: Vec<Link>,
}

impl MechanismPose {
    pub fn link(&self, role: LinkRole) -> Option<&Link> {
        self.links.iter().find(|l| l.role == role)
    }
}

/// Legend text for the moving parts of a mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub driver: &'static str,
    pub follower: &'static str,
    pub connector: &'static str,
    pub profile: &'static str,
}

/// A kinematic position model: a pure map from drive time to a pose.
pub trait Mechanism {
    /// Stable identifier, e.g. `ball-screw`.
    fn name(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn labels(&self) -> Labels;

    fn drive(&self) -> &Drive;

    fn pose(&self, time: f64) -> MechanismPose;

    /// Static outline of the driving element (thread, groove, cam contour),
    /// sampled with `samples` points.
    fn profile(&self, samples: usize) -> Vec<Point3d>;

    /// Plot volume that holds the whole run.
    fn bounds(&self) -> BoundingBox;

    /// Lowest and highest follower displacement over the run.
    fn displacement_range(&self) -> (f64, f64);

    /// `(elevation, azimuth)` in degrees the mechanism is best viewed from.
    fn default_view(&self) -> (f64, f64) {
        (30.0, -60.0)
    }

    /// Pose at a frame index of the drive schedule.
    fn pose_at_frame(&self, frame: usize) -> MechanismPose {
        self.pose(self.drive().time_at(frame))
    }
}

/// Plot volume around a rotating driver with a follower axis offset along X.
pub(crate) fn offset_axis_bounds(axis_x: f64, follower_x: f64, z_min: f64, z_max: f64) -> BoundingBox {
    BoundingBox::new(
        Point3d::new(axis_x.min(follower_x) - PLOT_MARGIN, -PLOT_MARGIN, z_min),
        Point3d::new(axis_x.max(follower_x) + PLOT_MARGIN, PLOT_MARGIN, z_max),
    )
}
