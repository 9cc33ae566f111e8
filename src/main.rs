use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod layout;
mod log;
mod model;
mod render;

use layout::RunType;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "scaling-plots")]
#[command(about = "Strong scaling plots from KSPSolve benchmark logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average solve times and render scaling + speedup charts per run type.
    Report {
        /// Folder holding one subdirectory of logs per run type.
        #[arg(long, default_value = "runs")]
        runs: PathBuf,

        /// Run types to report (default: all, in fixed order).
        #[arg(long = "case", value_enum)]
        cases: Vec<RunType>,

        /// Executable the speedups are measured against.
        #[arg(long, default_value = "original")]
        baseline: String,

        /// Where images are written before being moved into the runs folder.
        #[arg(long, default_value = ".")]
        stage_dir: PathBuf,

        /// Also write the averaged series as timings_<case>.json.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Report {
            runs,
            cases,
            baseline,
            stage_dir,
            json,
        } => {
            let cases = if cases.is_empty() {
                RunType::ALL.to_vec()
            } else {
                cases
            };

            for case in cases {
                for path in report_case(&runs, case, &baseline, &stage_dir, json)? {
                    println!("Wrote {}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Full pipeline for one run type: list logs, average, plot, relocate.
fn report_case(
    runs: &Path,
    case: RunType,
    baseline: &str,
    stage_dir: &Path,
    json: bool,
) -> Result<Vec<PathBuf>> {
    let _span = tracing::info_span!("case", %case).entered();

    // 1) Discover log files, grouped by executable.
    let groups = match layout::list_log_files(runs, case)? {
        Some(g) => g,
        None => anyhow::bail!(
            "no log files found in {}",
            runs.join(case.as_str()).display()
        ),
    };
    tracing::info!(
        executables = groups.len(),
        files = groups.values().map(Vec::len).sum::<usize>(),
        "found log files"
    );

    // 2) Average solve times across repeated runs.
    let times = model::average_solve_times(&groups)?;

    // 3) Render charts and move them next to the logs.
    let dest_dir = runs.join(case.as_str());
    let mut written = render::render_case(case, &times, baseline, stage_dir, &dest_dir)?;

    // 4) Optional machine-readable summary.
    if json {
        let speedups = model::speedup(&times, baseline)?;
        let summary = model::CaseSummary::new(case, baseline, &groups, times, speedups);
        let out = dest_dir.join(format!("timings_{}.json", case));
        std::fs::write(&out, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("write {}", out.display()))?;
        written.push(out);
    }

    Ok(written)
}
