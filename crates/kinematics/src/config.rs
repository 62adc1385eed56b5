//! JSON-loadable mechanism descriptions.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

use crate::drive::Drive;
use crate::error::KinematicsError;
use crate::law::DisplacementLaw;
use crate::mechanisms::{
    BallScrew, BallScrewParams, CylindricalCam, CylindricalCamParams, DiscCam, DiscCamParams,
    FlexLinkage, FlexLinkageParams, Mechanism, OrthogonalLinkage, OrthogonalLinkageParams,
};

/// Parameters of the dwell cam: a single-turn groove, flat for half a turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CamDwellConfig {
    pub radius: f64,
    /// Follower travel reached at the end of the turn.
    pub stroke: f64,
    pub cam_offset_x: f64,
    pub follower_offset_x: f64,
    pub drive: Drive,
}

impl Default for CamDwellConfig {
    fn default() -> Self {
        let p = CylindricalCamParams::dwell();
        Self {
            radius: p.radius,
            stroke: p.law.stroke().unwrap_or(2.5),
            cam_offset_x: p.cam_offset_x,
            follower_offset_x: p.follower_offset_x,
            drive: p.drive,
        }
    }
}

impl From<CamDwellConfig> for CylindricalCamParams {
    fn from(c: CamDwellConfig) -> Self {
        Self {
            radius: c.radius,
            law: DisplacementLaw::half_turn_dwell(c.stroke),
            cam_offset_x: c.cam_offset_x,
            follower_offset_x: c.follower_offset_x,
            drive: c.drive,
            ..Self::dwell()
        }
    }
}

/// One mechanism and its parameters, tagged by `kind`.
///
/// Missing fields take their defaults, so `{"kind": "cam_planar"}` is a
/// complete description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MechanismConfig {
    BallScrew(BallScrewParams),
    BallScrewDwell(BallScrewParams),
    CamPlanar(CylindricalCamParams),
    CamDwell(CamDwellConfig),
    CamOrthogonal(DiscCamParams),
    OrthogonalLinkage(OrthogonalLinkageParams),
    FlexLinkage(FlexLinkageParams),
}

impl MechanismConfig {
    /// Every mechanism identifier, in presentation order.
    pub const IDS: [&'static str; 7] = [
        "ball-screw",
        "ball-screw-dwell",
        "cam-planar",
        "cam-dwell",
        "cam-orthogonal",
        "orthogonal-linkage",
        "flex-linkage",
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::BallScrew(_) => "ball-screw",
            Self::BallScrewDwell(_) => "ball-screw-dwell",
            Self::CamPlanar(_) => "cam-planar",
            Self::CamDwell(_) => "cam-dwell",
            Self::CamOrthogonal(_) => "cam-orthogonal",
            Self::OrthogonalLinkage(_) => "orthogonal-linkage",
            Self::FlexLinkage(_) => "flex-linkage",
        }
    }

    /// Default configuration for an identifier such as `cam-dwell`.
    pub fn from_id(id: &str) -> Result<Self, KinematicsError> {
        Ok(match id {
            "ball-screw" => Self::BallScrew(BallScrewParams::default()),
            "ball-screw-dwell" => Self::BallScrewDwell(BallScrewParams::single_turn()),
            "cam-planar" => Self::CamPlanar(CylindricalCamParams::default()),
            "cam-dwell" => Self::CamDwell(CamDwellConfig::default()),
            "cam-orthogonal" => Self::CamOrthogonal(DiscCamParams::default()),
            "orthogonal-linkage" => Self::OrthogonalLinkage(OrthogonalLinkageParams::default()),
            "flex-linkage" => Self::FlexLinkage(FlexLinkageParams::default()),
            other => return Err(KinematicsError::UnknownMechanism(other.to_string())),
        })
    }

    pub fn defaults() -> Vec<Self> {
        Self::IDS
            .iter()
            .filter_map(|id| Self::from_id(id).ok())
            .collect()
    }

    /// Parse a single configuration object or an array of them.
    pub fn from_json_str(json: &str) -> Result<Vec<Self>, KinematicsError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let configs = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };
        Ok(configs)
    }

    #[instrument]
    pub fn from_json_file(path: &Path) -> Result<Vec<Self>, KinematicsError> {
        let text = std::fs::read_to_string(path).map_err(|source| KinematicsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let configs = Self::from_json_str(&text)?;
        debug!(count = configs.len(), "loaded mechanism configurations");
        Ok(configs)
    }

    /// Validate the parameters and build the mechanism.
    pub fn into_mechanism(self) -> Result<Box<dyn Mechanism>, KinematicsError> {
        Ok(match self {
            Self::BallScrew(p) => Box::new(BallScrew::new(p)?),
            Self::BallScrewDwell(p) => Box::new(BallScrew::with_dwell(p)?),
            Self::CamPlanar(p) => Box::new(CylindricalCam::new(p)?),
            Self::CamDwell(c) => Box::new(CylindricalCam::new(c.into())?),
            Self::CamOrthogonal(p) => Box::new(DiscCam::new(p)?),
            Self::OrthogonalLinkage(p) => Box::new(OrthogonalLinkage::new(p)?),
            Self::FlexLinkage(p) => Box::new(FlexLinkage::new(p)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_builds_its_own_mechanism() {
        for config in MechanismConfig::defaults() {
            let id = config.id();
            let mechanism = config.into_mechanism().unwrap();
            assert_eq!(mechanism.name(), id);
        }
        assert_eq!(MechanismConfig::defaults().len(), MechanismConfig::IDS.len());
    }

    #[test]
    fn test_unknown_id() {
        assert!(matches!(
            MechanismConfig::from_id("slider-crank"),
            Err(KinematicsError::UnknownMechanism(name)) if name == "slider-crank"
        ));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let configs = MechanismConfig::from_json_str(r#"{"kind": "ball_screw", "pitch": 1.0}"#).unwrap();
        assert_eq!(configs.len(), 1);
        let MechanismConfig::BallScrew(p) = configs[0] else {
            panic!("wrong kind: {:?}", configs[0]);
        };
        assert_eq!(p.pitch, 1.0);
        assert_eq!(p.radius, 0.5);
        assert_eq!(p.drive, Drive::default());
    }

    #[test]
    fn test_cam_dwell_json_keeps_its_defaults() {
        let configs = MechanismConfig::from_json_str(r#"[{"kind": "cam_dwell", "stroke": 3.0}]"#).unwrap();
        let params: CylindricalCamParams = match configs[0] {
            MechanismConfig::CamDwell(c) => c.into(),
            ref other => panic!("wrong kind: {other:?}"),
        };
        assert_eq!(params.radius, 1.0);
        assert_eq!(params.law.stroke(), Some(3.0));
        assert!(params.rod);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let err = MechanismConfig::from_json_str(r#"{"kind": "geneva"}"#).unwrap_err();
        assert!(matches!(err, KinematicsError::Config(_)));
    }

    #[test]
    fn test_invalid_parameters_fail_to_build() {
        let configs = MechanismConfig::from_json_str(r#"{"kind": "cam_orthogonal", "amplitude": -1}"#).unwrap();
        let err = configs[0].clone().into_mechanism().err().unwrap();
        assert!(matches!(err, KinematicsError::InvalidDimension { parameter: "amplitude", .. }));
    }

    #[test]
    fn test_huge_frame_count_fails_to_build() {
        for id in MechanismConfig::IDS {
            let kind = id.replace('-', "_");
            let json = format!(r#"{{"kind": "{kind}", "drive": {{"dt": 1e-300}}}}"#);
            let configs = MechanismConfig::from_json_str(&json).unwrap();
            let err = configs[0].clone().into_mechanism().err().unwrap();
            assert!(
                matches!(err, KinematicsError::TooManyFrames { .. }),
                "{id}: {err}"
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let err = MechanismConfig::from_json_file(Path::new("/nonexistent/mech.json")).unwrap_err();
        assert!(matches!(err, KinematicsError::Io { .. }));
    }
}
