//! Drawable description of one frame.

use serde::Serialize;
use tracing::trace;

use mech_kinematics::{BoundingBox, LinkRole, Mechanism, MechanismPose, Point3d, Trajectory};

use crate::style::{Color, Style};

/// Samples used for the static profile curve.
pub const PROFILE_SAMPLES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Polyline { points: Vec<Point3d>, style: Style },
    Marker { at: Point3d, style: Style },
}

impl Primitive {
    pub fn style(&self) -> &Style {
        match self {
            Self::Polyline { style, .. } | Self::Marker { style, .. } => style,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.style().label.as_deref()
    }

    pub fn points(&self) -> &[Point3d] {
        match self {
            Self::Polyline { points, .. } => points,
            Self::Marker { at, .. } => std::slice::from_ref(at),
        }
    }
}

/// Everything needed to draw a frame, in back-to-front drawing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub title: String,
    /// Time caption, e.g. `t = 1.25 s`.
    pub caption: String,
    pub bounds: BoundingBox,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(title: &str, bounds: BoundingBox) -> Self {
        Self {
            title: title.to_string(),
            caption: String::new(),
            bounds,
            primitives: Vec::new(),
        }
    }

    pub fn add_polyline(&mut self, points: Vec<Point3d>, style: Style) {
        if points.len() >= 2 {
            self.primitives.push(Primitive::Polyline { points, style });
        }
    }

    pub fn add_marker(&mut self, at: Point3d, style: Style) {
        self.primitives.push(Primitive::Marker { at, style });
    }

    /// Labels in drawing order, without repeats.
    pub fn legend(&self) -> Vec<(&str, &Style)> {
        let mut seen: Vec<(&str, &Style)> = Vec::new();
        for p in &self.primitives {
            if let Some(label) = p.label() {
                if !seen.iter().any(|(l, _)| *l == label) {
                    seen.push((label, p.style()));
                }
            }
        }
        seen
    }

    pub fn find(&self, label: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.label() == Some(label))
    }
}

/// Lay out a frame: plot box, static profile, traces, moving parts.
pub fn build_scene(mechanism: &dyn Mechanism, pose: &MechanismPose, trajectory: &Trajectory) -> Scene {
    let bounds = mechanism.bounds();
    let labels = mechanism.labels();
    let mut scene = Scene::new(mechanism.title(), bounds);
    scene.caption = format!("t = {:.2} s", pose.time);

    let corners = bounds.corners();
    for (a, b) in BoundingBox::EDGES {
        scene.add_polyline(vec![corners[a], corners[b]], Style::solid(Color::GRAY, 0.5));
    }

    scene.add_polyline(
        mechanism.profile(PROFILE_SAMPLES),
        Style::dashed(Color::BLACK, 1.0).labelled(labels.profile),
    );
    scene.add_polyline(
        trajectory.driver_path().collect(),
        Style::solid(Color::LIGHT_BLUE, 1.0),
    );

    // Linkages draw their driver as a link; everything else gets an arm.
    if pose.link(LinkRole::Primary).is_none() {
        scene.add_polyline(
            vec![pose.driver_hub, pose.driver_tip],
            Style::solid(Color::BLUE, 2.0).labelled(labels.driver),
        );
    }
    for link in &pose.links {
        let style = match link.role {
            LinkRole::Rod => Style::solid(Color::BLACK, 2.0).labelled("Rod"),
            LinkRole::Fixed => Style::solid(Color::BLACK, 2.0),
            LinkRole::Primary => Style::solid(Color::BLUE, 2.0).labelled(labels.driver),
            LinkRole::Secondary => Style::solid(Color::RED, 2.0).labelled(labels.follower),
        };
        scene.add_polyline(link.segment.points().to_vec(), style);
    }
    if let Some(connector) = pose.connector {
        scene.add_polyline(
            connector.points().to_vec(),
            Style::dashed(Color::GREEN, 2.0).labelled(labels.connector),
        );
    }
    scene.add_marker(pose.follower, Style::solid(Color::RED, 10.0).labelled(labels.follower));

    trace!(primitives = scene.primitives.len(), time = pose.time, "scene built");
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use mech_kinematics::MechanismConfig;

    fn scene_for(id: &str, frame: usize) -> Scene {
        let mechanism = MechanismConfig::from_id(id).unwrap().into_mechanism().unwrap();
        let mut trajectory = Trajectory::new();
        let mut pose = mechanism.pose_at_frame(0);
        for i in 0..=frame {
            pose = mechanism.pose_at_frame(i);
            trajectory.record(&pose);
        }
        build_scene(mechanism.as_ref(), &pose, &trajectory)
    }

    #[test]
    fn test_ball_screw_scene() {
        let scene = scene_for("ball-screw", 40);
        assert_eq!(scene.title, "Ball Screw and Nut");
        assert_eq!(scene.caption, "t = 2.00 s");
        let legend: Vec<&str> = scene.legend().into_iter().map(|(l, _)| l).collect();
        assert_eq!(legend, vec!["Helical Screw Groove", "Ball Screw", "Rod", "Nut Line", "Nut"]);

        let arm = scene.find("Ball Screw").unwrap();
        assert_eq!(arm.style().color, Color::BLUE);
        let groove = scene.find("Helical Screw Groove").unwrap();
        assert!(groove.style().dashed);
        assert_eq!(groove.points().len(), PROFILE_SAMPLES);
        assert!(matches!(scene.find("Nut"), Some(Primitive::Marker { .. })));
    }

    #[test]
    fn test_box_edges_present() {
        let scene = scene_for("cam-planar", 0);
        let gray = scene
            .primitives
            .iter()
            .filter(|p| p.style().color == Color::GRAY)
            .count();
        assert_eq!(gray, 12);
    }

    #[test]
    fn test_trace_grows_with_trajectory() {
        let early = scene_for("cam-orthogonal", 1);
        let late = scene_for("cam-orthogonal", 30);
        let trace_len = |s: &Scene| {
            s.primitives
                .iter()
                .find(|p| p.style().color == Color::LIGHT_BLUE)
                .map(|p| p.points().len())
        };
        assert_eq!(trace_len(&early), Some(2));
        assert_eq!(trace_len(&late), Some(31));
    }

    #[test]
    fn test_linkage_draws_links_not_arm() {
        let scene = scene_for("orthogonal-linkage", 10);
        let blue = scene
            .primitives
            .iter()
            .filter(|p| p.style().color == Color::BLUE)
            .count();
        assert_eq!(blue, 1);
        assert!(scene.find("Linkage B (Ab/Ad)").is_some());
        assert!(scene.find("Follower Line").is_none());
    }
}
