//! Per-frame stepping over a drive schedule.

use tracing::{debug, info, instrument};

use crate::drive::MAX_FRAMES;
use crate::mechanisms::{Mechanism, MechanismPose};
use crate::trajectory::Trajectory;

/// Walks a mechanism through its drive frames, one pose per call.
///
/// The stepper owns the trajectory; each step evaluates the pose at the next
/// frame time and appends it before handing the pose back.
pub struct Stepper<'a> {
    mechanism: &'a dyn Mechanism,
    frame: usize,
    frame_count: usize,
    trajectory: Trajectory,
}

impl<'a> Stepper<'a> {
    pub fn new(mechanism: &'a dyn Mechanism) -> Self {
        let frame_count = mechanism.drive().frame_count();
        Self {
            mechanism,
            frame: 0,
            frame_count,
            trajectory: Trajectory::with_capacity(frame_count.min(MAX_FRAMES)),
        }
    }

    /// Advance one frame. Returns `None` once the schedule is exhausted.
    pub fn step(&mut self) -> Option<(usize, MechanismPose)> {
        if self.frame >= self.frame_count {
            return None;
        }
        let index = self.frame;
        let pose = self.mechanism.pose_at_frame(index);
        self.trajectory.record(&pose);
        self.frame += 1;
        Some((index, pose))
    }

    pub fn is_done(&self) -> bool {
        self.frame >= self.frame_count
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// History up to and including the last step.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}

/// Run the whole schedule and return the recorded history.
#[instrument(skip(mechanism), fields(mechanism = mechanism.name()))]
pub fn simulate(mechanism: &dyn Mechanism) -> Trajectory {
    let mut stepper = Stepper::new(mechanism);
    while let Some((index, pose)) = stepper.step() {
        if index % 50 == 0 {
            debug!(index, time = pose.time, displacement = pose.displacement, "frame");
        }
    }
    let trajectory = stepper.into_trajectory();
    let (lo, hi) = trajectory
        .displacements()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, d)| (lo.min(d), hi.max(d)));
    info!(frames = trajectory.len(), min = lo, max = hi, "simulation complete");
    trajectory
}
