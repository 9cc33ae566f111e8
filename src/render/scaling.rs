//! Log-log strong scaling chart: solve time vs. core count, one line per executable.

use crate::Result;
use crate::layout::RunType;
use crate::model::{TimingSeries, plot_order};
use crate::render::{IMAGE_SIZE, palette};
use anyhow::{anyhow, bail};
use plotters::prelude::*;
use std::path::Path;

/// Headroom factor applied on both ends of each log axis.
const AXIS_PAD: f64 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingLine {
    pub label: String,
    pub color_index: usize,
    /// (cores, seconds), sorted by cores.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingLayout {
    pub lines: Vec<ScalingLine>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

pub fn file_name(case: RunType) -> String {
    format!("strong_scaling_{}.png", case)
}

/// Lines in plot order (baseline first) plus padded axis ranges.
///
/// Non-positive times cannot sit on a log axis and are left out.
pub fn scaling_layout(times: &TimingSeries, baseline: &str) -> Result<ScalingLayout> {
    let order = plot_order(times, baseline)?;
    palette::ensure_capacity(order.len())?;

    let mut lines = Vec::with_capacity(order.len());
    for (color_index, exe) in order.into_iter().enumerate() {
        let series = &times[exe];
        let points: Vec<(f64, f64)> = series
            .iter()
            .filter(|&(_, &t)| t > 0.0)
            .map(|(&cores, &t)| (cores as f64, t))
            .collect();
        if points.len() < series.len() {
            tracing::warn!(executable = exe, "dropping non-positive times from log-log chart");
        }
        lines.push(ScalingLine {
            label: exe.to_string(),
            color_index,
            points,
        });
    }

    let all = lines.iter().flat_map(|l| l.points.iter().copied());
    let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for (x, y) in all {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    if x_lo > x_hi {
        bail!("no timing data to plot");
    }

    Ok(ScalingLayout {
        lines,
        x_range: (x_lo / AXIS_PAD, x_hi * AXIS_PAD),
        y_range: (y_lo / AXIS_PAD, y_hi * AXIS_PAD),
    })
}

pub fn draw_scaling_chart(case: RunType, layout: &ScalingLayout, path: &Path) -> Result<()> {
    draw(case, layout, path).map_err(|e| anyhow!("render {}: {}", path.display(), e))
}

fn draw(
    case: RunType,
    layout: &ScalingLayout,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = layout.x_range;
    let (y0, y1) = layout.y_range;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Strong scaling: {}", case), ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Number of CPU cores")
        .y_desc("Inclusive wall time of KSPSolve")
        .bold_line_style(BLACK.mix(0.5))
        .light_line_style(BLACK.mix(0.15))
        .draw()?;

    for line in &layout.lines {
        let color = palette::color(line.color_index)?;
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                color.stroke_width(3),
            ))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
