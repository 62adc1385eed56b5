//! Time base shared by every mechanism.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{ensure_finite, ensure_positive, KinematicsError};

/// Longest run a drive may describe.
pub const MAX_FRAMES: usize = 1_000_000;

/// Constant-speed rotary input sampled at a fixed step.
///
/// Frames are taken at `t = i * dt` for every `t` in `[0, t_end)`, so the
/// end time itself is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drive {
    /// Rotation speed of the driving element (rad/s).
    pub angular_velocity: f64,
    /// Length of the run (s), exclusive.
    pub t_end: f64,
    /// Time between frames (s).
    pub dt: f64,
}

impl Default for Drive {
    fn default() -> Self {
        Self {
            angular_velocity: TAU / 10.0,
            t_end: 10.0,
            dt: 0.05,
        }
    }
}

impl Drive {
    pub fn new(angular_velocity: f64, t_end: f64, dt: f64) -> Self {
        Self {
            angular_velocity,
            t_end,
            dt,
        }
    }

    pub fn validate(&self) -> Result<(), KinematicsError> {
        ensure_finite("angular_velocity", self.angular_velocity)?;
        ensure_positive("dt", self.dt)?;
        ensure_positive("t_end", self.t_end)?;
        let count = self.exact_frame_count();
        if count > MAX_FRAMES as f64 {
            return Err(KinematicsError::TooManyFrames {
                count,
                limit: MAX_FRAMES,
            });
        }
        if self.frame_count() == 0 {
            return Err(KinematicsError::EmptyDrive {
                t_end: self.t_end,
                dt: self.dt,
            });
        }
        Ok(())
    }

    /// Number of samples in `[0, t_end)`, saturating at `usize::MAX`.
    pub fn frame_count(&self) -> usize {
        self.exact_frame_count() as usize
    }

    fn exact_frame_count(&self) -> f64 {
        if !(self.dt > 0.0 && self.t_end > 0.0) {
            return 0.0;
        }
        let ratio = self.t_end / self.dt;
        // Relative slack absorbs the representation error of dt, so that
        // 10 / 0.05 yields 200. Frame 0 always exists.
        (ratio - ratio * 1e-9).ceil().max(1.0)
    }

    pub fn time_at(&self, frame: usize) -> f64 {
        frame as f64 * self.dt
    }

    pub fn angle_at(&self, time: f64) -> f64 {
        self.angular_velocity * time
    }

    /// Angle reached at the last frame.
    pub fn final_angle(&self) -> f64 {
        match self.frame_count() {
            0 => 0.0,
            n => self.angle_at(self.time_at(n - 1)),
        }
    }

    /// `(frame index, time)` for every frame, in order.
    pub fn frames(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.frame_count()).map(move |i| (i, self.time_at(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_drive_has_200_frames() {
        let drive = Drive::default();
        assert_eq!(drive.frame_count(), 200);
        let last = drive.frames().last().unwrap();
        assert_eq!(last.0, 199);
        assert!((last.1 - 9.95).abs() < 1e-9);
    }

    #[test]
    fn test_other_step_sizes() {
        assert_eq!(Drive::new(1.0, 9.0, 0.05).frame_count(), 180);
        assert_eq!(Drive::new(1.0, 20.0, 0.1).frame_count(), 200);
        assert_eq!(Drive::new(1.0, 1.0, 0.3).frame_count(), 4);
    }

    #[test]
    fn test_angle_at() {
        let drive = Drive::default();
        assert!((drive.angle_at(5.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((drive.final_angle() - TAU * 0.995).abs() < 1e-12);
    }

    #[test]
    fn test_run_shorter_than_one_step_has_one_frame() {
        let drive = Drive::new(1.0, 1e-10, 1.0);
        assert_eq!(drive.frame_count(), 1);
        assert!(drive.validate().is_ok());
        assert_eq!(drive.frames().collect::<Vec<_>>(), vec![(0, 0.0)]);

        // Tolerance scales with the run, so tiny steps still count exactly.
        assert_eq!(Drive::new(1.0, 1e-8, 1e-10).frame_count(), 100);
    }

    #[test]
    fn test_validate_caps_frame_count() {
        match Drive::new(1.0, 10.0, 1e-300).validate() {
            Err(KinematicsError::TooManyFrames { count, limit }) => {
                assert!(count > 1e300);
                assert_eq!(limit, MAX_FRAMES);
            }
            other => panic!("expected TooManyFrames, got {other:?}"),
        }
        assert!(Drive::new(1.0, 1.0, 1.0 / MAX_FRAMES as f64).validate().is_ok());
        assert!(Drive::new(1.0, 2.0, 1.0 / MAX_FRAMES as f64).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_step() {
        assert!(Drive::new(1.0, 10.0, 0.0).validate().is_err());
        assert!(Drive::new(1.0, -1.0, 0.1).validate().is_err());
        assert!(Drive::new(f64::INFINITY, 1.0, 0.1).validate().is_err());
        assert!(Drive::default().validate().is_ok());
    }
}
