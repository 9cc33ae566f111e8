//! Aggregation model: average solve times per executable and derive speedups.

use crate::Result;
use crate::layout::{FileGroups, RunType};
use crate::log::{SolveSample, SolveTimeParser};
use anyhow::{anyhow, bail};
use serde::Serialize;
use std::collections::BTreeMap;

/// Averaged solve time (seconds) keyed by core count.
pub type CoreSeries = BTreeMap<u32, f64>;

/// Per-executable averaged solve times.
pub type TimingSeries = BTreeMap<String, CoreSeries>;

/// Per-executable speedup against the baseline, same shape as [`TimingSeries`].
pub type SpeedupSeries = BTreeMap<String, CoreSeries>;

/// Sum solve times per core count over one executable's files, then divide
/// by the number of files.
///
/// Each inner slice holds the samples of one file. The divisor counts files,
/// not matches: a file with no block at some core count still counts toward
/// that core count's mean.
pub fn accumulate(per_file: &[Vec<SolveSample>]) -> CoreSeries {
    let mut sums = CoreSeries::new();
    for samples in per_file {
        for s in samples {
            *sums.entry(s.cores).or_insert(0.0) += s.solve;
        }
    }

    let files = per_file.len() as f64;
    for v in sums.values_mut() {
        *v /= files;
    }
    sums
}

/// Parse every log file and average solve times per (executable, cores).
pub fn average_solve_times(groups: &FileGroups) -> Result<TimingSeries> {
    let parser = SolveTimeParser::new()?;

    let mut times = TimingSeries::new();
    for (exe, files) in groups {
        let per_file = files
            .iter()
            .map(|path| parser.parse_file(path))
            .collect::<Result<Vec<_>>>()?;

        let series = accumulate(&per_file);
        if series.is_empty() {
            tracing::warn!(executable = %exe, files = files.len(), "no timing blocks found");
        } else {
            tracing::debug!(executable = %exe, files = files.len(), points = series.len(), "averaged");
        }
        times.insert(exe.clone(), series);
    }

    Ok(times)
}

/// Speedup of each executable relative to `baseline` at matching core counts.
///
/// Every executable must report exactly the baseline's core counts.
pub fn speedup(times: &TimingSeries, baseline: &str) -> Result<SpeedupSeries> {
    let base = times
        .get(baseline)
        .ok_or_else(|| anyhow!("baseline executable {:?} has no timing data", baseline))?;

    let mut out = SpeedupSeries::new();
    for (exe, series) in times {
        if let Some(extra) = series.keys().find(|n| !base.contains_key(n)) {
            bail!(
                "executable {:?} reports {} cores, but baseline {:?} does not",
                exe,
                extra,
                baseline
            );
        }

        let mut ratios = CoreSeries::new();
        for (&cores, &base_time) in base {
            let time = match series.get(&cores) {
                Some(t) => *t,
                None => bail!(
                    "executable {:?} has no measurement at {} cores (baseline {:?} does)",
                    exe,
                    cores,
                    baseline
                ),
            };
            if !(time.is_finite() && time > 0.0) {
                bail!(
                    "executable {:?} reports a solve time of {} s at {} cores; speedup needs a positive time",
                    exe,
                    time,
                    cores
                );
            }
            ratios.insert(cores, base_time / time);
        }
        out.insert(exe.clone(), ratios);
    }

    Ok(out)
}

/// Largest speedup in the series, or 0 when there is none.
pub fn max_speedup(speedups: &SpeedupSeries) -> f64 {
    speedups
        .values()
        .flat_map(|s| s.values().copied())
        .fold(0.0, f64::max)
}

/// Legend order: baseline first, then the remaining executables by name.
pub fn plot_order<'a, V>(series: &'a BTreeMap<String, V>, baseline: &str) -> Result<Vec<&'a str>> {
    let (first, _) = series
        .get_key_value(baseline)
        .ok_or_else(|| anyhow!("baseline executable {:?} has no timing data", baseline))?;

    let mut order = Vec::with_capacity(series.len());
    order.push(first.as_str());
    order.extend(
        series
            .keys()
            .filter(|name| name.as_str() != baseline)
            .map(String::as_str),
    );
    Ok(order)
}

/// Machine-readable summary of one case, written next to the charts.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub case: RunType,
    pub baseline: String,
    /// Number of log files averaged per executable.
    pub files: BTreeMap<String, usize>,
    pub times: TimingSeries,
    pub speedup: SpeedupSeries,
}

impl CaseSummary {
    pub fn new(
        case: RunType,
        baseline: &str,
        groups: &FileGroups,
        times: TimingSeries,
        speedup: SpeedupSeries,
    ) -> Self {
        Self {
            case,
            baseline: baseline.to_string(),
            files: groups.iter().map(|(e, f)| (e.clone(), f.len())).collect(),
            times,
            speedup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;

    fn sample(cores: u32, solve: f64) -> SolveSample {
        SolveSample {
            cores,
            init: 0.0,
            prep: 0.0,
            solve,
        }
    }

    fn series(points: &[(u32, f64)]) -> CoreSeries {
        points.iter().copied().collect()
    }

    #[test]
    fn averages_over_files() {
        let per_file = vec![vec![sample(4, 2.0)], vec![sample(4, 4.0)]];
        assert_eq!(accumulate(&per_file), series(&[(4, 3.0)]));
    }

    #[test]
    fn divisor_counts_files_not_matches() {
        // The second file never reached 8 cores.
        let per_file = vec![
            vec![sample(4, 2.0), sample(8, 1.0)],
            vec![sample(4, 4.0)],
        ];
        assert_eq!(accumulate(&per_file), series(&[(4, 3.0), (8, 0.5)]));
    }

    #[test]
    fn no_files_yield_empty_series() {
        assert!(accumulate(&[]).is_empty());
    }

    #[test]
    fn averages_log_files_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let write = |name: &str, text: &str| -> PathBuf {
            let p = tmp.path().join(name);
            fs::write(&p, text).unwrap();
            p
        };

        let mut groups = FileGroups::new();
        groups.insert(
            "original".to_string(),
            vec![
                write("a.log", "4 Cores\nKSPSolve Time: [0.1, 0.2, 2.0]\n"),
                write("b.log", "4 Cores\nKSPSolve Time: [0.1, 0.2, 4.0]\n"),
            ],
        );
        groups.insert(
            "fast".to_string(),
            vec![write("c.log", "4 Cores\nKSPSolve Time: [0.1, 0.2, 1.5]\n")],
        );

        let times = average_solve_times(&groups).unwrap();
        let mut expected = TimingSeries::new();
        expected.insert("fast".to_string(), series(&[(4, 1.5)]));
        expected.insert("original".to_string(), series(&[(4, 3.0)]));
        assert_eq!(times, expected);
    }

    fn two_executables() -> TimingSeries {
        let mut times = TimingSeries::new();
        times.insert("original".to_string(), series(&[(1, 10.0), (2, 5.0)]));
        times.insert("fast".to_string(), series(&[(1, 10.0), (2, 2.5)]));
        times
    }

    #[test]
    fn speedup_against_baseline() {
        let got = speedup(&two_executables(), "original").unwrap();
        let mut expected = SpeedupSeries::new();
        expected.insert("original".to_string(), series(&[(1, 1.0), (2, 1.0)]));
        expected.insert("fast".to_string(), series(&[(1, 1.0), (2, 2.0)]));
        assert_eq!(got, expected);
        assert_eq!(max_speedup(&got), 2.0);
    }

    #[test]
    fn baseline_speedup_is_one() {
        let mut times = TimingSeries::new();
        times.insert("original".to_string(), series(&[(1, 3.7), (8, 0.61), (64, 0.09)]));
        let got = speedup(&times, "original").unwrap();
        assert!(got["original"].values().all(|&v| v == 1.0));
    }

    #[test]
    fn missing_core_count_is_fatal() {
        let mut times = two_executables();
        times.insert("slow".to_string(), series(&[(1, 20.0)]));
        let err = speedup(&times, "original").unwrap_err();
        assert!(err.to_string().contains("\"slow\" has no measurement at 2 cores"));
    }

    #[test]
    fn extra_core_count_is_fatal() {
        let mut times = two_executables();
        times.insert("wide".to_string(), series(&[(1, 9.0), (2, 4.0), (4, 2.0)]));
        let err = speedup(&times, "original").unwrap_err();
        assert!(err.to_string().contains("reports 4 cores"));
    }

    #[test]
    fn zero_solve_time_is_fatal() {
        let mut times = two_executables();
        times.insert("fast".to_string(), series(&[(1, 10.0), (2, 0.0)]));
        let err = speedup(&times, "original").unwrap_err();
        assert!(err.to_string().contains("\"fast\" reports a solve time of 0 s at 2 cores"));
    }

    #[test]
    fn missing_baseline_is_fatal() {
        assert!(speedup(&two_executables(), "reference").is_err());
        assert!(plot_order(&two_executables(), "reference").is_err());
    }

    #[test]
    fn baseline_leads_plot_order() {
        let mut times = two_executables();
        times.insert("alpha".to_string(), series(&[(1, 1.0), (2, 1.0)]));
        assert_eq!(
            plot_order(&times, "original").unwrap(),
            vec!["original", "alpha", "fast"]
        );
    }

    #[test]
    fn summary_serializes_with_case_label() {
        let times = two_executables();
        let speedups = speedup(&times, "original").unwrap();
        let mut groups = FileGroups::new();
        groups.insert("original".to_string(), vec![PathBuf::from("x.log")]);
        groups.insert("fast".to_string(), vec![PathBuf::from("y.log")]);

        let summary = CaseSummary::new(RunType::SingleNodeScaling, "original", &groups, times, speedups);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["case"], "single-node-scaling");
        assert_eq!(json["files"]["fast"], 1);
        assert_eq!(json["speedup"]["fast"]["2"], 2.0);
    }
}
