//! Premium totals by booking date and state, for trend reporting.
//!
//! Only policy ids present in both ledgers contribute. This is an inner
//! join, unlike reconciliation's outer join.

use crate::{
    error::ReconResult,
    store::{BookingStateTotals, SourceStore},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingRecord {
    pub booking_date: Option<String>,
    pub state: Option<String>,
    pub total_policy_premium: f64,
    pub total_gl_premium: f64,
    pub variance: f64,
}

impl From<BookingStateTotals> for ReportingRecord {
    fn from(t: BookingStateTotals) -> Self {
        Self {
            variance: t.total_gl_premium - t.total_policy_premium,
            booking_date: t.booking_date,
            state: t.state,
            total_policy_premium: t.total_policy_premium,
            total_gl_premium: t.total_gl_premium,
        }
    }
}

/// Rows come back ordered by (booking_date, state) ascending.
pub fn aggregate(store: &SourceStore) -> ReconResult<Vec<ReportingRecord>> {
    let records: Vec<ReportingRecord> = store
        .booking_state_totals()?
        .into_iter()
        .map(ReportingRecord::from)
        .collect();
    log::info!("Reporting: {} (booking_date, state) groups", records.len());
    Ok(records)
}
