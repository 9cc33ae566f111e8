//! Fixed series colors (the "tab10" qualitative palette).

use crate::Result;
use anyhow::bail;
use plotters::style::RGBColor;

pub const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Fail when a chart would need more colors than the palette has.
pub fn ensure_capacity(series: usize) -> Result<()> {
    if series > SERIES_COLORS.len() {
        bail!(
            "{} executables to plot, but only {} series colors are available",
            series,
            SERIES_COLORS.len()
        );
    }
    Ok(())
}

/// Color of the series at `index` in plot order.
pub fn color(index: usize) -> Result<RGBColor> {
    match SERIES_COLORS.get(index) {
        Some(c) => Ok(*c),
        None => bail!("no series color for index {}", index),
    }
}
