//! Follower displacement laws.
//!
//! A law maps the drive input to the follower's travel along its axis. The
//! rotary laws (`Linear`, `DwellRise`) take the driver's rotation angle in
//! radians; `Sinusoid` takes elapsed time in seconds.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{ensure_positive, KinematicsError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "law", rename_all = "snake_case")]
pub enum DisplacementLaw {
    /// Helical rise: `pitch` of travel per full turn.
    Linear { pitch: f64 },
    /// Rest for `dwell` radians, then rise linearly to `stroke` over the next
    /// `rise` radians and hold there.
    DwellRise { dwell: f64, rise: f64, stroke: f64 },
    /// `amplitude * sin(angular_frequency * t)`.
    Sinusoid {
        amplitude: f64,
        angular_frequency: f64,
    },
}

impl DisplacementLaw {
    pub fn linear(pitch: f64) -> Self {
        Self::Linear { pitch }
    }

    /// Rest for the first half turn, reach `stroke` at the end of the turn.
    pub fn half_turn_dwell(stroke: f64) -> Self {
        Self::DwellRise {
            dwell: PI,
            rise: PI,
            stroke,
        }
    }

    pub fn sinusoid(amplitude: f64, angular_frequency: f64) -> Self {
        Self::Sinusoid {
            amplitude,
            angular_frequency,
        }
    }

    pub fn validate(&self) -> Result<(), KinematicsError> {
        match *self {
            Self::Linear { pitch } => ensure_positive("pitch", pitch),
            Self::DwellRise {
                dwell,
                rise,
                stroke,
            } => {
                if !(dwell.is_finite() && dwell >= 0.0) {
                    return Err(KinematicsError::InvalidDimension {
                        parameter: "dwell",
                        value: dwell,
                    });
                }
                ensure_positive("rise", rise)?;
                ensure_positive("stroke", stroke)
            }
            Self::Sinusoid {
                amplitude,
                angular_frequency,
            } => {
                ensure_positive("amplitude", amplitude)?;
                ensure_positive("angular_frequency", angular_frequency)
            }
        }
    }

    /// Follower travel for the given drive input.
    pub fn displacement(&self, input: f64) -> f64 {
        match *self {
            Self::Linear { pitch } => pitch * input / TAU,
            Self::DwellRise {
                dwell,
                rise,
                stroke,
            } => {
                if input <= dwell {
                    0.0
                } else {
                    stroke * ((input - dwell) / rise).min(1.0)
                }
            }
            Self::Sinusoid {
                amplitude,
                angular_frequency,
            } => amplitude * (angular_frequency * input).sin(),
        }
    }

    /// Lowest and highest displacement reached for inputs in `[0, input_end]`.
    pub fn range(&self, input_end: f64) -> (f64, f64) {
        match *self {
            Self::Linear { .. } | Self::DwellRise { .. } => {
                let a = self.displacement(0.0);
                let b = self.displacement(input_end);
                (a.min(b), a.max(b))
            }
            Self::Sinusoid {
                amplitude,
                angular_frequency,
            } => {
                // Sine is odd: work on |amplitude| over |phase| and mirror
                // when exactly one of them is negative.
                let phase = (angular_frequency * input_end).abs();
                let peak = amplitude.abs();
                let last = peak * phase.sin();
                let max = if phase >= FRAC_PI_2 { peak } else { last };
                let min = if phase >= 3.0 * FRAC_PI_2 {
                    -peak
                } else if phase > PI {
                    last
                } else {
                    0.0
                };
                if (amplitude < 0.0) != (angular_frequency * input_end < 0.0) {
                    (-max, -min)
                } else {
                    (min, max)
                }
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::DwellRise { .. } => "dwell-rise",
            Self::Sinusoid { .. } => "sinusoid",
        }
    }

    /// Total travel after the rotary input completes, if the law saturates.
    pub fn stroke(&self) -> Option<f64> {
        match *self {
            Self::DwellRise { stroke, .. } => Some(stroke),
            _ => None,
        }
    }
}
