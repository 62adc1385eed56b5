pub mod config;
pub mod drive;
pub mod error;
pub mod geometry;
pub mod law;
pub mod mechanisms;
pub mod simulate;
pub mod trajectory;

// Re-export the working set at crate root.
pub use config::{CamDwellConfig, MechanismConfig};
pub use drive::{Drive, MAX_FRAMES};
pub use error::KinematicsError;
pub use geometry::bounds::BoundingBox;
pub use geometry::point::{Point2d, Point3d};
pub use law::DisplacementLaw;
pub use mechanisms::{Labels, Link, LinkRole, Mechanism, MechanismPose};
pub use simulate::{simulate, Stepper};
pub use trajectory::{Trajectory, TrajectorySample};
