use crate::Result;
use crate::log::row::SolveSample;
use anyhow::Context;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Extracts KSPSolve timing blocks from benchmark log text.
///
/// Expected shape (the block may span several lines):
///
/// ```text
/// 16 Cores
/// ...
/// KSPSolve Time (init, prep, solve): [0.0123, 0.456, 7.89]
/// ```
pub struct SolveTimeParser {
    re: Regex,
}

impl SolveTimeParser {
    pub fn new() -> Result<Self> {
        // Capture:
        // 1) core count directly before " Cores"
        // 2..4) the bracketed triple on the next line mentioning "Time"
        let re = Regex::new(r"(\d+) Cores[\s\S]*?Time.*?: \[(\S*?), (\S*?), (\S*?)\]")?;
        Ok(Self { re })
    }

    /// All non-overlapping timing blocks in `text`, in order of appearance.
    ///
    /// Blocks whose numbers don't parse are skipped.
    pub fn parse(&self, text: &str) -> Vec<SolveSample> {
        self.re
            .captures_iter(text)
            .filter_map(|caps| match sample_from(&caps) {
                Some(sample) => Some(sample),
                None => {
                    tracing::debug!(block = &caps[0], "skipping unparseable timing block");
                    None
                }
            })
            .collect()
    }

    /// Read a benchmark log file and extract its timing samples.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<SolveSample>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read log file {}", path.display()))?;
        Ok(self.parse(&text))
    }
}

fn sample_from(caps: &Captures<'_>) -> Option<SolveSample> {
    let number = |idx: usize| caps.get(idx)?.as_str().parse::<f64>().ok();
    Some(SolveSample {
        cores: caps.get(1)?.as_str().parse().ok()?,
        init: number(2)?,
        prep: number(3)?,
        solve: number(4)?,
    })
}
