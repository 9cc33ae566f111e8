//! Benchmark configurations, one results subdirectory each.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunType {
    SingleNodeScaling,
    MultipleNodeScaling,
}

impl RunType {
    /// Every run type, in report order.
    pub const ALL: [RunType; 2] = [RunType::SingleNodeScaling, RunType::MultipleNodeScaling];

    /// Directory name and filename prefix, e.g. "single-node-scaling".
    pub fn as_str(self) -> &'static str {
        match self {
            RunType::SingleNodeScaling => "single-node-scaling",
            RunType::MultipleNodeScaling => "multiple-node-scaling",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_match_directory_names() {
        let labels: Vec<String> = RunType::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(labels, vec!["single-node-scaling", "multiple-node-scaling"]);
    }

    #[test]
    fn clap_accepts_hyphenated_label() {
        let parsed = <RunType as ValueEnum>::from_str("multiple-node-scaling", false).unwrap();
        assert_eq!(parsed, RunType::MultipleNodeScaling);
    }
}
