//! Run summary: what was read, what was found, where it went.

use crate::{
    quality::{Check, DqIssue},
    reconciliation::{FlagReason, ReconciliationRecord},
    types::SourceTable,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCount {
    pub table_name: String,
    pub rows: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckCount {
    pub table_name: String,
    pub check_name: String,
    pub issues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagCount {
    pub flag_reason: FlagReason,
    pub policies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub data_quality_issues: String,
    pub reconciliation_results: String,
    pub reporting_dataset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_rows: Vec<TableCount>,
    pub total_issues: usize,
    pub issues_by_check: Vec<CheckCount>,
    pub reconciliation_rows: usize,
    pub flags: Vec<FlagCount>,
    pub reporting_rows: usize,
    pub outputs: OutputPaths,
}

impl RunSummary {
    /// Every check and every flag reason is listed, zero counts included.
    pub fn count_issues(issues: &[DqIssue]) -> Vec<CheckCount> {
        Check::ALL
            .iter()
            .map(|check| {
                let table_name = check.table().name();
                CheckCount {
                    table_name: table_name.to_string(),
                    check_name: check.name().to_string(),
                    issues: issues
                        .iter()
                        .filter(|i| i.table_name == table_name && i.check_name == check.name())
                        .count(),
                }
            })
            .collect()
    }

    pub fn count_flags(records: &[ReconciliationRecord]) -> Vec<FlagCount> {
        FlagReason::ALL
            .iter()
            .map(|&flag| FlagCount {
                flag_reason: flag,
                policies: records.iter().filter(|r| r.flag_reason == flag).count(),
            })
            .collect()
    }

    pub fn input_count(&self, table: SourceTable) -> i64 {
        self.input_rows
            .iter()
            .find(|t| t.table_name == table.name())
            .map_or(0, |t| t.rows)
    }

    pub fn flag_count(&self, flag: FlagReason) -> usize {
        self.flags
            .iter()
            .find(|f| f.flag_reason == flag)
            .map_or(0, |f| f.policies)
    }
}
