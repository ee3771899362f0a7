use super::{SourceRow, SourceStore};
use crate::{
    error::ReconResult,
    quality::{Check, RESERVE_TOLERANCE},
};

impl SourceStore {
    /// Every row of the check's table that fails the check, in input order.
    pub fn failing_rows(&self, check: Check) -> ReconResult<Vec<SourceRow>> {
        self.rows_where(check.table(), &predicate_sql(check))
    }
}

/// The WHERE clause selecting offending rows. SQL comparison against NULL
/// is never true, so numeric checks skip rows whose operands are missing.
fn predicate_sql(check: Check) -> String {
    match check {
        Check::DuplicatePolicyId => "policy_id IN (
                SELECT policy_id FROM policies
                WHERE policy_id IS NOT NULL
                GROUP BY policy_id
                HAVING COUNT(*) > 1
            )"
        .into(),
        Check::PolicyNullKeyOrPremium => "policy_id IS NULL OR written_premium IS NULL".into(),
        Check::GlNullKeyOrPremium => "policy_id IS NULL OR premium_booked IS NULL".into(),
        Check::NegativePremiumBooked => "premium_booked < 0".into(),
        Check::NullClaimOrPolicyId => "claim_id IS NULL OR policy_id IS NULL".into(),
        Check::NegativeIncurredLoss => "incurred_loss < 0".into(),
        Check::PaidGreaterThanIncurred => "paid_loss > incurred_loss".into(),
        Check::ReserveMismatch => {
            // Rounded so decimal inputs sitting exactly on the tolerance do not fire.
            format!("ROUND(ABS(reserve - (incurred_loss - paid_loss)), 9) > {RESERVE_TOLERANCE}")
        }
    }
}
