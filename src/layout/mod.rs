//! Layout of a benchmark `runs` folder.
//!
//! Log files live under `<runs>/<run_type>/` and are named
//! `<run_type>-<executable>-<id>.log`. This module owns:
//! - RunType (the fixed set of benchmark configurations)
//! - log filename parsing and per-executable grouping

pub mod files;
pub mod run_type;

pub use files::{FileGroups, list_log_files};
pub use run_type::RunType;
