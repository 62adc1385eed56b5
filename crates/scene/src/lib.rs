//! Rendering-agnostic scene layer: what to draw for a mechanism pose, and
//! where it lands on a canvas.

pub mod camera;
pub mod scene;
pub mod style;

pub use camera::{Camera, Viewport};
pub use scene::{build_scene, Primitive, Scene};
pub use style::{Color, Style};
