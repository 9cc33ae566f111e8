//! Grouped bar chart of speedups, one group per core count.

use crate::Result;
use crate::layout::RunType;
use crate::model::{TimingSeries, max_speedup, plot_order, speedup};
use crate::render::{IMAGE_SIZE, palette};
use anyhow::{anyhow, bail};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const BAR_WIDTH: f64 = 0.8;
/// Empty slots between neighbouring groups.
const GROUP_GAP: usize = 2;
const Y_HEADROOM: f64 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub color_index: usize,
    pub bars: Vec<Bar>,
}

/// Bar geometry in data coordinates.
///
/// With `B` executables a group occupies `B + 2` unit slots; executable `i`
/// of group `g` starts at `(B + 2) * g + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub series: Vec<BarSeries>,
    /// (x position, core count label)
    pub ticks: Vec<(f64, String)>,
    pub x_range: (f64, f64),
    pub y_max: f64,
}

pub fn file_name(case: RunType) -> String {
    format!("speed_up_{}.png", case)
}

pub fn bar_layout(times: &TimingSeries, baseline: &str) -> Result<BarLayout> {
    let speedups = speedup(times, baseline)?;
    let order = plot_order(&speedups, baseline)?;
    palette::ensure_capacity(order.len())?;

    let cores: Vec<u32> = speedups[baseline].keys().copied().collect();
    if cores.is_empty() {
        bail!("no timing data to plot");
    }

    let bars_per_group = order.len();
    let slot = (bars_per_group + GROUP_GAP) as f64;

    let mut series = Vec::with_capacity(bars_per_group);
    for (i, exe) in order.into_iter().enumerate() {
        let ratios = &speedups[exe];
        let bars = cores
            .iter()
            .enumerate()
            .map(|(g, n)| {
                let x0 = slot * g as f64 + i as f64;
                Bar {
                    x0,
                    x1: x0 + BAR_WIDTH,
                    height: ratios[n],
                }
            })
            .collect();
        series.push(BarSeries {
            label: exe.to_string(),
            color_index: i,
            bars,
        });
    }

    let ticks = cores
        .iter()
        .enumerate()
        .map(|(g, n)| (slot * g as f64 + bars_per_group as f64 / 2.0, n.to_string()))
        .collect();

    let y_max = max_speedup(&speedups) * Y_HEADROOM;
    if !(y_max.is_finite() && y_max > 0.0) {
        bail!("speedup axis has no usable extent (max {})", y_max);
    }

    Ok(BarLayout {
        series,
        ticks,
        x_range: (-1.5, slot * cores.len() as f64 - 0.5),
        y_max,
    })
}

pub fn draw_speedup_chart(case: RunType, layout: &BarLayout, path: &Path) -> Result<()> {
    draw(case, layout, path).map_err(|e| anyhow!("render {}: {}", path.display(), e))
}

fn draw(
    case: RunType,
    layout: &BarLayout,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = layout.x_range;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Speedup of KSPSolve from {}", case), ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0f64..layout.y_max)?;

    // Core-count labels are placed by hand under each group below.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc("Number of CPU cores")
        .y_desc("Speedup of KSPSolve")
        .draw()?;

    for s in &layout.series {
        let color = palette::color(s.color_index)?;
        chart
            .draw_series(
                s.bars
                    .iter()
                    .map(|b| Rectangle::new([(b.x0, 0.0), (b.x1, b.height)], color.filled())),
            )?
            .label(s.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    let tick_style = TextStyle::from(("sans-serif", 15).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (x, label) in &layout.ticks {
        let (px, py) = chart.backend_coord(&(*x, 0.0));
        root.draw(&Text::new(label.as_str(), (px, py + 6), tick_style.clone()))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn times() -> TimingSeries {
        let mut t = TimingSeries::new();
        t.insert("original".to_string(), [(1, 10.0), (2, 5.0)].into_iter().collect());
        t.insert("fast".to_string(), [(1, 10.0), (2, 2.5)].into_iter().collect());
        t
    }

    #[test]
    fn bars_are_grouped_by_core_count() {
        let layout = bar_layout(&times(), "original").unwrap();

        // Two executables -> four slots per group.
        assert_eq!(
            layout.series[0],
            BarSeries {
                label: "original".to_string(),
                color_index: 0,
                bars: vec![
                    Bar { x0: 0.0, x1: 0.8, height: 1.0 },
                    Bar { x0: 4.0, x1: 4.8, height: 1.0 },
                ],
            }
        );
        assert_eq!(
            layout.series[1],
            BarSeries {
                label: "fast".to_string(),
                color_index: 1,
                bars: vec![
                    Bar { x0: 1.0, x1: 1.8, height: 1.0 },
                    Bar { x0: 5.0, x1: 5.8, height: 2.0 },
                ],
            }
        );
    }

    #[test]
    fn ticks_and_ranges() {
        let layout = bar_layout(&times(), "original").unwrap();
        assert_eq!(
            layout.ticks,
            vec![(1.0, "1".to_string()), (5.0, "2".to_string())]
        );
        assert_eq!(layout.x_range, (-1.5, 7.5));
        assert_eq!(layout.y_max, 2.5);
    }

    #[test]
    fn mismatched_core_counts_abort_layout() {
        let mut t = times();
        t.insert("partial".to_string(), [(1, 4.0)].into_iter().collect());
        assert!(bar_layout(&t, "original").is_err());
    }

    #[test]
    fn zero_solve_time_aborts_layout() {
        let mut t = times();
        t.insert("fast".to_string(), [(1, 10.0), (2, 0.0)].into_iter().collect());
        assert!(bar_layout(&t, "original").is_err());
    }

    #[test]
    fn zero_baseline_time_aborts_layout() {
        let mut t = TimingSeries::new();
        t.insert("original".to_string(), [(1, 0.0)].into_iter().collect());
        let err = bar_layout(&t, "original").unwrap_err();
        assert!(err.to_string().contains("\"original\" reports a solve time of 0 s"));
    }

    #[test]
    fn image_name_uses_case_label() {
        assert_eq!(
            file_name(RunType::SingleNodeScaling),
            "speed_up_single-node-scaling.png"
        );
    }
}
