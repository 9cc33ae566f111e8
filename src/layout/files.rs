use crate::Result;
use crate::layout::RunType;
use anyhow::{Context, bail};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Log files of one run type, keyed by executable name. Paths are sorted.
pub type FileGroups = BTreeMap<String, Vec<PathBuf>>;

/// Components of a log filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogName {
    pub run_type: RunType,
    pub executable: String,
    pub id: String,
}

/// Parse "<run_type>-<executable>-<id>.log".
///
/// The id is a timestamp made of digits, '-' and ':' (e.g. 2017-10-12:13:45:01).
/// The executable is the shortest name that leaves a valid id behind, so
/// executables may themselves contain dashes.
///
/// Example:
/// single-node-scaling-openacc-2017-10-12:13:45:01.log  =>  "openacc"
pub fn parse_log_name(run_type: RunType, file_name: &str) -> Result<LogName> {
    let re = Regex::new(&format!(
        r"^{}-(\S*?)-([0-9:-]*)\.log$",
        regex::escape(run_type.as_str())
    ))?;

    let caps = match re.captures(file_name) {
        Some(c) => c,
        None => bail!(
            "log file {:?} does not fit filename pattern {}-<executable>-<id>.log",
            file_name,
            run_type
        ),
    };

    let executable = caps.get(1).map_or("", |m| m.as_str());
    if executable.is_empty() {
        bail!("log file {:?} has an empty executable name", file_name);
    }
    let id = caps.get(2).map_or("", |m| m.as_str());

    Ok(LogName {
        run_type,
        executable: executable.to_string(),
        id: id.to_string(),
    })
}

/// Collect `<base>/<run_type>/*.log`, grouped by executable.
///
/// Returns `Ok(None)` when there is nothing to report (directory missing or no
/// log files). A log file with a malformed name is an error.
pub fn list_log_files(base: &Path, run_type: RunType) -> Result<Option<FileGroups>> {
    let dir = base.join(run_type.as_str());

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("read log directory {}", dir.display()));
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read log directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "log") {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Ok(None);
    }
    paths.sort();

    let mut groups = FileGroups::new();
    for path in paths {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => bail!("log file name is not valid UTF-8: {}", path.display()),
        };
        let name = parse_log_name(run_type, file_name)
            .with_context(|| format!("list log files in {}", dir.display()))?;
        tracing::debug!(run_type = %name.run_type, executable = %name.executable, id = %name.id, "found log file");
        groups.entry(name.executable).or_default().push(path);
    }

    Ok(Some(groups))
}
