//! Orthographic view of the 3D plot volume and its fit onto a canvas.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use mech_kinematics::{BoundingBox, Mechanism, Point2d, Point3d};

/// Viewer direction given as elevation above the XY plane and azimuth
/// around Z, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            elevation: 30.0,
            azimuth: -60.0,
        }
    }
}

impl Camera {
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// The view a mechanism is presented from unless told otherwise.
    pub fn for_mechanism(mechanism: &dyn Mechanism) -> Self {
        let (elevation, azimuth) = mechanism.default_view();
        Self::new(elevation, azimuth)
    }

    /// World to view rotation. Rows are the screen right, screen up and
    /// toward-viewer directions.
    pub fn rotation(&self) -> Matrix3<f64> {
        let (se, ce) = self.elevation.to_radians().sin_cos();
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        Matrix3::new(
            -sa, ca, 0.0,
            -se * ca, -se * sa, ce,
            ce * ca, ce * sa, se,
        )
    }

    /// Screen-plane coordinates, y up.
    pub fn project(&self, p: &Point3d) -> Point2d {
        let v = self.rotation() * Vector3::new(p.x, p.y, p.z);
        Point2d::new(v.x, v.y)
    }
}

/// Affine map from projected coordinates to canvas pixels (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    scale: f64,
    min: Point2d,
    offset_x: f64,
    offset_y: f64,
}

/// Space kept free above the drawing for the title.
pub const TITLE_BAND: f64 = 25.0;

impl Viewport {
    /// Fit the projection of `bounds` into a `width` x `height` canvas,
    /// keeping the aspect ratio and `padding` pixels clear on every side.
    pub fn fit(bounds: &BoundingBox, camera: &Camera, width: f64, height: f64, padding: f64) -> Self {
        let mut min = Point2d::new(f64::MAX, f64::MAX);
        let mut max = Point2d::new(f64::MIN, f64::MIN);
        for corner in bounds.corners() {
            let q = camera.project(&corner);
            min.x = min.x.min(q.x);
            min.y = min.y.min(q.y);
            max.x = max.x.max(q.x);
            max.y = max.y.max(q.y);
        }

        let avail_w = (width - 2.0 * padding).max(1.0);
        let avail_h = (height - 2.0 * padding - TITLE_BAND).max(1.0);
        let data_w = (max.x - min.x).max(0.001);
        let data_h = (max.y - min.y).max(0.001);
        let scale = (avail_w / data_w).min(avail_h / data_h);
        Self {
            width,
            height,
            scale,
            min,
            offset_x: padding + (avail_w - data_w * scale) / 2.0,
            offset_y: padding + (avail_h - data_h * scale) / 2.0,
        }
    }

    pub fn to_pixel(&self, q: Point2d) -> (f64, f64) {
        let x = (q.x - self.min.x) * self.scale + self.offset_x;
        let y = self.height - ((q.y - self.min.y) * self.scale + self.offset_y);
        (x, y)
    }

    pub fn map(&self, camera: &Camera, p: &Point3d) -> (f64, f64) {
        self.to_pixel(camera.project(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = Camera::new(23.0, -71.0).rotation();
        let identity = r * r.transpose();
        assert_relative_eq!(identity, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_side_view() {
        // Looking from +X with Z up: +Y is to the right.
        let camera = Camera::new(0.0, 0.0);
        let q = camera.project(&Point3d::new(5.0, 1.0, 2.0));
        assert_relative_eq!(q.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 2.0, epsilon = 1e-12);
        // Depth along the view axis does not move the point on screen.
        let far = camera.project(&Point3d::new(-5.0, 1.0, 2.0));
        assert_relative_eq!(far.x, q.x, epsilon = 1e-12);
        assert_relative_eq!(far.y, q.y, epsilon = 1e-12);
    }

    #[test]
    fn test_top_view_keeps_xy() {
        let camera = Camera::new(90.0, -90.0);
        let q = camera.project(&Point3d::new(3.0, 4.0, 10.0));
        assert_relative_eq!(q.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_viewport_keeps_bounds_on_canvas() {
        let bounds = BoundingBox::new(Point3d::new(-2.5, -2.5, 0.0), Point3d::new(5.0, 2.5, 5.0));
        let camera = Camera::default();
        let vp = Viewport::fit(&bounds, &camera, 640.0, 480.0, 20.0);
        for corner in bounds.corners() {
            let (x, y) = vp.map(&camera, &corner);
            assert!((20.0 - 1e-9..=620.0 + 1e-9).contains(&x), "x = {x}");
            assert!((20.0 - 1e-9..=460.0 + 1e-9).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn test_camera_for_mechanism() {
        use mech_kinematics::MechanismConfig;
        let view = |id: &str| {
            let mechanism = MechanismConfig::from_id(id).unwrap().into_mechanism().unwrap();
            Camera::for_mechanism(mechanism.as_ref())
        };
        assert_eq!(view("ball-screw"), Camera::default());
        assert_eq!(view("orthogonal-linkage"), Camera::new(20.0, 30.0));
        assert_eq!(view("flex-linkage"), Camera::new(20.0, 30.0));
    }

    #[test]
    fn test_viewport_flips_y() {
        let bounds = BoundingBox::new(Point3d::new(0.0, 0.0, 0.0), Point3d::new(1.0, 1.0, 1.0));
        let camera = Camera::new(0.0, 0.0);
        let vp = Viewport::fit(&bounds, &camera, 100.0, 100.0, 0.0);
        let (_, low) = vp.map(&camera, &Point3d::new(0.0, 0.0, 0.0));
        let (_, high) = vp.map(&camera, &Point3d::new(0.0, 0.0, 1.0));
        assert!(high < low);
    }
}
