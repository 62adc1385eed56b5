use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a mechanism from parameters.
///
/// Position evaluation itself never fails; every check happens once, when
/// parameters enter the crate.
#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("{parameter} must be positive and finite, got {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },
    #[error("{parameter} must be finite, got {value}")]
    NonFinite { parameter: &'static str, value: f64 },
    #[error("drive has no frames (t_end = {t_end}, dt = {dt})")]
    EmptyDrive { t_end: f64, dt: f64 },
    #[error("drive needs {count} frames, at most {limit} are allowed")]
    TooManyFrames { count: f64, limit: usize },
    #[error("{mechanism} cannot be driven by a {law} law")]
    UnsupportedLaw {
        mechanism: &'static str,
        law: &'static str,
    },
    #[error("unknown mechanism `{0}`")]
    UnknownMechanism(String),
    #[error("invalid mechanism configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("cannot read configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<(), KinematicsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KinematicsError::InvalidDimension { parameter, value })
    }
}

pub(crate) fn ensure_finite(parameter: &'static str, value: f64) -> Result<(), KinematicsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KinematicsError::NonFinite { parameter, value })
    }
}
