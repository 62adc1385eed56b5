//! Trajectory chart: the driver's path in the base plane above the
//! follower's displacement over time.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use mech_kinematics::{Mechanism, Trajectory};

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let pad = ((hi - lo) * 0.05).max(0.1);
    (lo - pad, hi + pad)
}

pub fn write_chart(path: &Path, mechanism: &dyn Mechanism, trajectory: &Trajectory) -> Result<()> {
    let labels = mechanism.labels();
    let root = SVGBackend::new(path, (600, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(mechanism.title(), ("sans-serif", 24))?;
    let areas = root.split_evenly((2, 1));
    let (upper, lower) = match areas.as_slice() {
        [upper, lower] => (upper, lower),
        _ => anyhow::bail!("expected two drawing areas"),
    };

    // Square XY panel that holds the whole plot volume footprint.
    let bounds = mechanism.bounds();
    let half = (bounds.max.x - bounds.min.x).max(bounds.max.y - bounds.min.y) / 2.0;
    let cx = (bounds.max.x + bounds.min.x) / 2.0;
    let cy = (bounds.max.y + bounds.min.y) / 2.0;

    let mut cc = ChartBuilder::on(upper)
        .margin(5)
        .set_all_label_area_size(50)
        .caption(format!("{} XY Trajectory", labels.driver), ("sans-serif", 18))
        .build_cartesian_2d((cx - half)..(cx + half), (cy - half)..(cy + half))?;

    cc.configure_mesh()
        .x_desc("X")
        .y_desc("Y")
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;

    cc.draw_series(LineSeries::new(trajectory.driver_xy().map(|p| (p.x, p.y)), &BLUE))?
        .label(labels.driver)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    cc.configure_series_labels().border_style(BLACK).draw()?;

    let drive = mechanism.drive();
    let (lo, hi) = mechanism.displacement_range();
    let (lo, hi) = padded(lo, hi);

    let mut cc = ChartBuilder::on(lower)
        .margin(5)
        .set_all_label_area_size(50)
        .caption(format!("{} Displacement", labels.follower), ("sans-serif", 18))
        .build_cartesian_2d(0.0..drive.t_end, lo..hi)?;

    cc.configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Displacement")
        .x_labels(10)
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.2}", v))
        .draw()?;

    cc.draw_series(LineSeries::new(trajectory.displacements(), &RED))?
        .label(labels.follower)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    cc.configure_series_labels().border_style(BLACK).draw()?;

    root.present()
        .with_context(|| format!("writing chart {}", path.display()))?;
    Ok(())
}
