//! Writes the three output tables as CSV and the run summary as JSON.
//!
//! Each output goes to its own file with no cross-file transaction. A
//! failed run may leave some outputs behind; re-running overwrites them.

use crate::{
    error::{ReconError, ReconResult},
    quality::DqIssue,
    reconciliation::ReconciliationRecord,
    reporting::ReportingRecord,
    summary::RunSummary,
};
use serde::Serialize;
use std::{fs::File, path::Path};

pub const ISSUE_COLUMNS: [&str; 4] = ["table_name", "check_name", "policy_id", "issue_detail"];

pub const RECONCILIATION_COLUMNS: [&str; 6] = [
    "policy_id",
    "premium_policy",
    "premium_gl",
    "diff",
    "diff_pct",
    "flag_reason",
];

pub const REPORTING_COLUMNS: [&str; 5] = [
    "booking_date",
    "state",
    "total_policy_premium",
    "total_gl_premium",
    "variance",
];

pub fn write_issues(path: &Path, issues: &[DqIssue]) -> ReconResult<()> {
    write_csv(path, &ISSUE_COLUMNS, issues)
}

pub fn write_reconciliation(path: &Path, records: &[ReconciliationRecord]) -> ReconResult<()> {
    write_csv(path, &RECONCILIATION_COLUMNS, records)
}

pub fn write_reporting(path: &Path, records: &[ReportingRecord]) -> ReconResult<()> {
    write_csv(path, &REPORTING_COLUMNS, records)
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> ReconResult<()> {
    let file = create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    log::info!("Run summary saved to {}", path.display());
    Ok(())
}

/// The header is written explicitly so an empty table still gets one.
fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> ReconResult<()> {
    let file = create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| ReconError::Write {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> ReconResult<File> {
    let to_write_error = |source| ReconError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(to_write_error)?;
    }
    File::create(path).map_err(to_write_error)
}
