//! Run configuration: where the inputs live and where the outputs go.
//!
//! Thresholds are not configuration. They live next to the check or
//! classification that uses them.

use crate::{error::ReconResult, types::SourceTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ISSUES_FILE: &str = "data_quality_issues.csv";
pub const RECONCILIATION_FILE: &str = "reconciliation_results.csv";
pub const REPORTING_FILE: &str = "reporting_dataset.csv";
pub const SUMMARY_FILE: &str = "run_summary.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policies_file: String,
    pub gl_file: String,
    pub claims_file: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            policies_file: "policies.csv".into(),
            gl_file: "accounting_gl.csv".into(),
            claims_file: "claims.csv".into(),
        }
    }
}

impl RunConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file. Absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> ReconResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn input_path(&self, table: SourceTable) -> PathBuf {
        let file = match table {
            SourceTable::Policies     => &self.policies_file,
            SourceTable::AccountingGl => &self.gl_file,
            SourceTable::Claims       => &self.claims_file,
        };
        self.data_dir.join(file)
    }

    pub fn issues_path(&self) -> PathBuf {
        self.output_dir.join(ISSUES_FILE)
    }

    pub fn reconciliation_path(&self) -> PathBuf {
        self.output_dir.join(RECONCILIATION_FILE)
    }

    pub fn reporting_path(&self) -> PathBuf {
        self.output_dir.join(REPORTING_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{ "data_dir": "/srv/inputs", "gl_file": "gl_2024.csv" }"#)
                .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/inputs"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(
            config.input_path(SourceTable::AccountingGl),
            PathBuf::from("/srv/inputs/gl_2024.csv")
        );
        assert_eq!(
            config.input_path(SourceTable::Policies),
            PathBuf::from("/srv/inputs/policies.csv")
        );
    }
}
