//! Render mechanism animations to SVG frame sequences and trajectory charts.

mod chart;
mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

use mech_kinematics::{Mechanism, MechanismConfig, Stepper, Trajectory};
use mech_scene::{build_scene, Camera};

/// Animate classic mechanism kinematics as SVG frames.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Mechanisms to render: ball-screw, ball-screw-dwell, cam-planar,
    /// cam-dwell, cam-orthogonal, orthogonal-linkage, flex-linkage, or all.
    mechanisms: Vec<String>,

    /// Output directory; each mechanism gets its own subdirectory.
    #[arg(short, long, default_value = "renders")]
    out_dir: PathBuf,

    /// JSON file with mechanism configurations (one object or an array).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write every Nth frame.
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    stride: u32,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Camera elevation in degrees [default: per mechanism].
    #[arg(long, allow_hyphen_values = true)]
    elevation: Option<f64>,

    /// Camera azimuth in degrees [default: per mechanism].
    #[arg(long, allow_hyphen_values = true)]
    azimuth: Option<f64>,

    /// Also dump the trajectory as JSON.
    #[arg(long)]
    json: bool,

    /// Skip the trajectory chart.
    #[arg(long)]
    no_chart: bool,

    /// More logging (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Configurations from the file first, then named mechanisms not already
/// covered by it.
fn resolve_configs(cli: &Cli) -> Result<Vec<MechanismConfig>> {
    let mut configs = match &cli.config {
        Some(path) => MechanismConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Vec::new(),
    };

    let mut names: Vec<&str> = Vec::new();
    for name in &cli.mechanisms {
        if name == "all" {
            names.extend(MechanismConfig::IDS);
        } else {
            names.push(name.as_str());
        }
    }
    for name in names {
        if configs.iter().any(|c| c.id() == name) {
            continue;
        }
        configs.push(MechanismConfig::from_id(name)?);
    }

    if configs.is_empty() {
        bail!(
            "no mechanism given; choose from {} or all",
            MechanismConfig::IDS.join(", ")
        );
    }
    Ok(configs)
}

/// The mechanism's own view, with any angle given on the command line
/// taking its place.
fn camera_for(mechanism: &dyn Mechanism, cli: &Cli) -> Camera {
    let view = Camera::for_mechanism(mechanism);
    Camera::new(
        cli.elevation.unwrap_or(view.elevation),
        cli.azimuth.unwrap_or(view.azimuth),
    )
}

#[instrument(skip_all, fields(mechanism = mechanism.name()))]
fn render(mechanism: &dyn Mechanism, cli: &Cli) -> Result<PathBuf> {
    let dir = cli.out_dir.join(mechanism.name());
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let camera = camera_for(mechanism, cli);
    debug!(elevation = camera.elevation, azimuth = camera.azimuth, "camera");
    let (width, height) = (f64::from(cli.width), f64::from(cli.height));
    let stride = cli.stride as usize;

    let mut stepper = Stepper::new(mechanism);
    let mut written = 0;
    while let Some((index, pose)) = stepper.step() {
        let last = stepper.is_done();
        if index % stride != 0 && !last {
            continue;
        }
        let scene = build_scene(mechanism, &pose, stepper.trajectory());
        let path = dir.join(format!("frame_{index:04}.svg"));
        fs::write(&path, svg::scene_to_svg(&scene, &camera, width, height))
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "frame written");
        written += 1;
    }
    let trajectory = stepper.into_trajectory();

    if !cli.no_chart {
        let path = dir.join("trajectory.svg");
        match chart::write_chart(&path, mechanism, &trajectory) {
            Ok(()) => debug!(path = %path.display(), "chart written"),
            // Charts need a system font; frames do not.
            Err(err) => warn!("skipping chart: {err:#}"),
        }
    }

    if cli.json {
        let path = dir.join("trajectory.json");
        write_json(&path, &trajectory)?;
        debug!(path = %path.display(), "trajectory written");
    }

    info!(frames = trajectory.len(), written, dir = %dir.display(), "rendered");
    Ok(dir)
}

fn write_json(path: &Path, trajectory: &Trajectory) -> Result<()> {
    let text = serde_json::to_string_pretty(trajectory)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    for config in resolve_configs(&cli)? {
        let id = config.id();
        let mechanism = config
            .into_mechanism()
            .with_context(|| format!("building {id}"))?;
        render(mechanism.as_ref(), &cli)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mech-render").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["ball-screw"]);
        assert_eq!(cli.out_dir, PathBuf::from("renders"));
        assert_eq!(cli.stride, 10);
        assert_eq!((cli.width, cli.height), (640, 480));
        assert!(!cli.json && !cli.no_chart);
        assert_eq!((cli.elevation, cli.azimuth), (None, None));
    }

    #[test]
    fn test_camera_defaults_per_mechanism() {
        let build = |id: &str| MechanismConfig::from_id(id).unwrap().into_mechanism().unwrap();
        let linkage = build("orthogonal-linkage");
        let screw = build("ball-screw");

        let cli = parse(&["all"]);
        assert_eq!(camera_for(linkage.as_ref(), &cli), Camera::new(20.0, 30.0));
        assert_eq!(camera_for(screw.as_ref(), &cli), Camera::new(30.0, -60.0));

        // Flags win, one angle at a time.
        let cli = parse(&["--azimuth", "-45", "all"]);
        assert_eq!(camera_for(linkage.as_ref(), &cli), Camera::new(20.0, -45.0));
        let cli = parse(&["--elevation", "10", "--azimuth", "5", "all"]);
        assert_eq!(camera_for(screw.as_ref(), &cli), Camera::new(10.0, 5.0));
    }

    #[test]
    fn test_all_expands_in_order() {
        let ids: Vec<&str> = resolve_configs(&parse(&["all"]))
            .unwrap()
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(ids, MechanismConfig::IDS.to_vec());
    }

    #[test]
    fn test_duplicates_collapse() {
        let configs = resolve_configs(&parse(&["cam-dwell", "cam-dwell"])).unwrap();
        assert_eq!(configs.len(), 1);
    }

    #[test]
    fn test_unknown_and_empty_rejected() {
        assert!(resolve_configs(&parse(&["pendulum"])).is_err());
        assert!(resolve_configs(&parse(&[])).is_err());
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(Cli::try_parse_from(["mech-render", "--stride", "0", "all"]).is_err());
    }

    #[test]
    fn test_render_writes_frames() {
        let out = std::env::temp_dir().join(format!("mech-render-test-{}", std::process::id()));
        let cli = parse(&[
            "--out-dir",
            out.to_str().unwrap(),
            "--stride",
            "50",
            "--no-chart",
            "--json",
            "orthogonal-linkage",
        ]);
        let mechanism = resolve_configs(&cli).unwrap().remove(0).into_mechanism().unwrap();
        let dir = render(mechanism.as_ref(), &cli).unwrap();

        // 180 frames: 0, 50, 100, 150 and the last one.
        for index in [0, 50, 100, 150, 179] {
            assert!(dir.join(format!("frame_{index:04}.svg")).is_file());
        }
        assert!(!dir.join("frame_0001.svg").exists());
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("trajectory.json")).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(180));
        fs::remove_dir_all(&out).unwrap();
    }
}
