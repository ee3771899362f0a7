//! Data-quality rule engine.
//!
//! The rule set is closed: eight (table, check) pairs evaluated in the
//! order of `Check::ALL`. Each check scans its whole table and yields one
//! issue per offending row. A row failing several checks is reported once
//! under each of them.

use crate::{
    error::ReconResult,
    store::{SourceRow, SourceStore},
    types::{PolicyId, SourceTable},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Absolute tolerance for reserve vs incurred minus paid, in currency units.
pub const RESERVE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    DuplicatePolicyId,
    PolicyNullKeyOrPremium,
    GlNullKeyOrPremium,
    NegativePremiumBooked,
    NullClaimOrPolicyId,
    NegativeIncurredLoss,
    PaidGreaterThanIncurred,
    ReserveMismatch,
}

impl Check {
    /// Evaluation order. Issue output follows this order.
    pub const ALL: [Check; 8] = [
        Check::DuplicatePolicyId,
        Check::PolicyNullKeyOrPremium,
        Check::GlNullKeyOrPremium,
        Check::NegativePremiumBooked,
        Check::NullClaimOrPolicyId,
        Check::NegativeIncurredLoss,
        Check::PaidGreaterThanIncurred,
        Check::ReserveMismatch,
    ];

    pub fn table(self) -> SourceTable {
        match self {
            Check::DuplicatePolicyId
            | Check::PolicyNullKeyOrPremium => SourceTable::Policies,
            Check::GlNullKeyOrPremium
            | Check::NegativePremiumBooked => SourceTable::AccountingGl,
            Check::NullClaimOrPolicyId
            | Check::NegativeIncurredLoss
            | Check::PaidGreaterThanIncurred
            | Check::ReserveMismatch => SourceTable::Claims,
        }
    }

    /// Stable label written to the `check_name` column.
    pub fn name(self) -> &'static str {
        match self {
            Check::DuplicatePolicyId       => "duplicate_policy_id",
            Check::PolicyNullKeyOrPremium  => "null_key_or_premium",
            Check::GlNullKeyOrPremium      => "null_key_or_premium",
            Check::NegativePremiumBooked   => "negative_premium_booked",
            Check::NullClaimOrPolicyId     => "null_claim_or_policy_id",
            Check::NegativeIncurredLoss    => "negative_incurred_loss",
            Check::PaidGreaterThanIncurred => "paid_greater_than_incurred",
            Check::ReserveMismatch         => "reserve_mismatch",
        }
    }
}

/// One offending row under one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqIssue {
    pub table_name: String,
    pub check_name: String,
    pub policy_id: Option<PolicyId>,
    /// The full row as a JSON object, columns in schema order.
    pub issue_detail: String,
}

impl DqIssue {
    fn from_row(check: Check, row: SourceRow) -> ReconResult<Self> {
        Ok(Self {
            table_name: check.table().name().to_string(),
            check_name: check.name().to_string(),
            policy_id: row.policy_id,
            issue_detail: serde_json::to_string(&JsonValue::Object(row.detail))?,
        })
    }
}

/// Run one check against the snapshot.
pub fn evaluate_check(store: &SourceStore, check: Check) -> ReconResult<Vec<DqIssue>> {
    store
        .failing_rows(check)?
        .into_iter()
        .map(|row| DqIssue::from_row(check, row))
        .collect()
}

/// Run the full rule set. Issues are grouped by check in `Check::ALL`
/// order, and by input row order within a check.
pub fn evaluate(store: &SourceStore) -> ReconResult<Vec<DqIssue>> {
    let mut issues = Vec::new();
    for check in Check::ALL {
        let found = evaluate_check(store, check)?;
        log::debug!(
            "check {}.{}: {} issues",
            check.table(),
            check.name(),
            found.len()
        );
        issues.extend(found);
    }
    log::info!("Data quality: {} issues across {} checks", issues.len(), Check::ALL.len());
    Ok(issues)
}
