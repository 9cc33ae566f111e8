//! PNG rendering of scaling and speedup charts.

pub mod palette;
pub mod scaling;
pub mod speedup;

use crate::Result;
use crate::layout::RunType;
use crate::model::TimingSeries;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Pixel size of every chart.
pub const IMAGE_SIZE: (u32, u32) = (800, 600);

/// Render both charts for `case` into `stage_dir`, then move them into
/// `dest_dir`. Returns the final image paths.
pub fn render_case(
    case: RunType,
    times: &TimingSeries,
    baseline: &str,
    stage_dir: &Path,
    dest_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);

    let layout = scaling::scaling_layout(times, baseline)?;
    let staged = stage_dir.join(scaling::file_name(case));
    scaling::draw_scaling_chart(case, &layout, &staged)?;
    written.push(relocate(&staged, dest_dir)?);

    let layout = speedup::bar_layout(times, baseline)?;
    let staged = stage_dir.join(speedup::file_name(case));
    speedup::draw_speedup_chart(case, &layout, &staged)?;
    written.push(relocate(&staged, dest_dir)?);

    Ok(written)
}

/// Move `staged` into `dest_dir`, keeping its file name.
///
/// Falls back to copy + remove when a plain rename is not possible (e.g. the
/// staging directory is on another filesystem).
pub fn relocate(staged: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = staged
        .file_name()
        .with_context(|| format!("staged image has no file name: {}", staged.display()))?;
    let dest = dest_dir.join(file_name);

    if dest.as_path() == staged {
        return Ok(dest);
    }

    if let Err(e) = fs::rename(staged, &dest) {
        tracing::debug!(error = %e, "rename failed, copying instead");
        fs::copy(staged, &dest).with_context(|| {
            format!("move {} to {}", staged.display(), dest.display())
        })?;
        fs::remove_file(staged)
            .with_context(|| format!("remove staged image {}", staged.display()))?;
    }

    Ok(dest)
}
