//! The batch engine: one snapshot in, three tables out.
//!
//! EXECUTION ORDER (fixed, documented):
//!   1. Load the three inputs into the snapshot (fatal on any missing input)
//!   2. Data-quality rule engine
//!   3. Reconciliation engine
//!   4. Reporting aggregator
//!   5. Write issues, reconciliation, reporting, summary
//!
//! RULES:
//!   - Stages 2-4 read the snapshot and never write to it, so their
//!     relative order does not change any result.
//!   - The snapshot is passed explicitly; there is no shared global store.
//!   - Nothing is persisted between runs. Re-running overwrites the outputs.

use crate::{
    config::RunConfig,
    error::ReconResult,
    quality::{self, DqIssue},
    reconciliation::{self, ReconciliationRecord},
    reporting::{self, ReportingRecord},
    sink,
    store::SourceStore,
    summary::{OutputPaths, RunSummary, TableCount},
    types::SourceTable,
};
use chrono::Utc;
use uuid::Uuid;

/// Results of the three analyses over one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub issues: Vec<DqIssue>,
    pub reconciliation: Vec<ReconciliationRecord>,
    pub reporting: Vec<ReportingRecord>,
}

impl Analysis {
    /// Run all three analyses against `store`. Pure: no files are touched.
    pub fn run(store: &SourceStore) -> ReconResult<Self> {
        Ok(Self {
            issues: quality::evaluate(store)?,
            reconciliation: reconciliation::reconcile(store)?,
            reporting: reporting::aggregate(store)?,
        })
    }
}

pub struct ReconEngine {
    pub config: RunConfig,
}

impl ReconEngine {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Load, analyse and write. Returns the summary that was written.
    pub fn run(&self) -> ReconResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        log::info!("Run {run_id} started: data_dir={}", self.config.data_dir.display());

        let store = SourceStore::load(&self.config)?;
        let input_rows = SourceTable::ALL
            .iter()
            .map(|&table| -> ReconResult<TableCount> {
                Ok(TableCount {
                    table_name: table.name().to_string(),
                    rows: store.row_count(table)?,
                })
            })
            .collect::<ReconResult<Vec<_>>>()?;

        let analysis = Analysis::run(&store)?;
        let outputs = self.write(&analysis)?;

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            input_rows,
            total_issues: analysis.issues.len(),
            issues_by_check: RunSummary::count_issues(&analysis.issues),
            reconciliation_rows: analysis.reconciliation.len(),
            flags: RunSummary::count_flags(&analysis.reconciliation),
            reporting_rows: analysis.reporting.len(),
            outputs,
        };
        sink::write_summary(&self.config.summary_path(), &summary)?;

        log::info!("Run {run_id} complete");
        Ok(summary)
    }

    fn write(&self, analysis: &Analysis) -> ReconResult<OutputPaths> {
        let issues = self.config.issues_path();
        let recon = self.config.reconciliation_path();
        let report = self.config.reporting_path();

        sink::write_issues(&issues, &analysis.issues)?;
        sink::write_reconciliation(&recon, &analysis.reconciliation)?;
        sink::write_reporting(&report, &analysis.reporting)?;

        Ok(OutputPaths {
            data_quality_issues: issues.display().to_string(),
            reconciliation_results: recon.display().to_string(),
            reporting_dataset: report.display().to_string(),
        })
    }
}
