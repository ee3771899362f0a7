//! Premium reconciliation between the policy ledger and the GL.
//!
//! One record per non-null policy_id seen on either side. Sums come from
//! the store's full outer join; difference, ratio and flag are derived here.

use crate::{
    error::ReconResult,
    store::{PremiumPair, SourceStore},
    types::PolicyId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute GL-minus-policy difference above which a record is flagged.
pub const LARGE_DIFFERENCE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagReason {
    #[serde(rename = "Missing in policies")]
    MissingInPolicies,
    #[serde(rename = "Missing in GL")]
    MissingInGl,
    #[serde(rename = "Large difference")]
    LargeDifference,
    #[serde(rename = "OK")]
    Ok,
}

impl FlagReason {
    pub const ALL: [FlagReason; 4] = [
        FlagReason::MissingInPolicies,
        FlagReason::MissingInGl,
        FlagReason::LargeDifference,
        FlagReason::Ok,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlagReason::MissingInPolicies => "Missing in policies",
            FlagReason::MissingInGl       => "Missing in GL",
            FlagReason::LargeDifference   => "Large difference",
            FlagReason::Ok                => "OK",
        }
    }
}

impl fmt::Display for FlagReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    pub policy_id: PolicyId,
    pub premium_policy: Option<f64>,
    pub premium_gl: Option<f64>,
    pub diff: Option<f64>,
    pub diff_pct: Option<f64>,
    pub flag_reason: FlagReason,
}

impl ReconciliationRecord {
    pub fn from_sums(
        policy_id: PolicyId,
        premium_policy: Option<f64>,
        premium_gl: Option<f64>,
    ) -> Self {
        let diff = match (premium_gl, premium_policy) {
            (Some(gl), Some(policy)) => Some(gl - policy),
            _ => None,
        };
        // A zero policy premium gives no ratio rather than an infinite one.
        // Negative premiums still divide.
        let diff_pct = match (diff, premium_policy) {
            (Some(d), Some(policy)) if policy != 0.0 => Some(d / policy),
            _ => None,
        };
        Self {
            policy_id,
            premium_policy,
            premium_gl,
            diff,
            diff_pct,
            flag_reason: classify(premium_policy, premium_gl, diff),
        }
    }
}

impl From<PremiumPair> for ReconciliationRecord {
    fn from(pair: PremiumPair) -> Self {
        Self::from_sums(pair.policy_id, pair.premium_policy, pair.premium_gl)
    }
}

/// First matching rule wins: absence on the policy side, then on the GL
/// side, then magnitude.
pub fn classify(
    premium_policy: Option<f64>,
    premium_gl: Option<f64>,
    diff: Option<f64>,
) -> FlagReason {
    if premium_policy.is_none() {
        return FlagReason::MissingInPolicies;
    }
    if premium_gl.is_none() {
        return FlagReason::MissingInGl;
    }
    match diff {
        Some(d) if d.abs() > LARGE_DIFFERENCE_THRESHOLD => FlagReason::LargeDifference,
        _ => FlagReason::Ok,
    }
}

pub fn reconcile(store: &SourceStore) -> ReconResult<Vec<ReconciliationRecord>> {
    let records: Vec<ReconciliationRecord> = store
        .premium_pairs()?
        .into_iter()
        .map(ReconciliationRecord::from)
        .collect();
    log::info!("Reconciliation: {} policy ids", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_policy_side_wins_over_everything() {
        assert_eq!(classify(None, None, None), FlagReason::MissingInPolicies);
        assert_eq!(classify(None, Some(900.0), None), FlagReason::MissingInPolicies);
    }

    #[test]
    fn missing_gl_side_checked_before_magnitude() {
        assert_eq!(classify(Some(1000.0), None, None), FlagReason::MissingInGl);
    }

    #[test]
    fn threshold_is_strict() {
        let at = ReconciliationRecord::from_sums("P1".into(), Some(100.0), Some(150.0));
        assert_eq!(at.diff, Some(50.0));
        assert_eq!(at.flag_reason, FlagReason::Ok);

        let below = ReconciliationRecord::from_sums("P2".into(), Some(100.0), Some(49.0));
        assert_eq!(below.diff, Some(-51.0));
        assert_eq!(below.flag_reason, FlagReason::LargeDifference);
    }

    #[test]
    fn zero_policy_premium_has_no_ratio() {
        let rec = ReconciliationRecord::from_sums("P3".into(), Some(0.0), Some(20.0));
        assert_eq!(rec.diff, Some(20.0));
        assert_eq!(rec.diff_pct, None);
        assert_eq!(rec.flag_reason, FlagReason::Ok);
    }

    #[test]
    fn negative_policy_premium_still_divides() {
        let rec = ReconciliationRecord::from_sums("P4".into(), Some(-200.0), Some(100.0));
        assert_eq!(rec.diff, Some(300.0));
        assert_eq!(rec.diff_pct, Some(-1.5));
        assert_eq!(rec.flag_reason, FlagReason::LargeDifference);
    }

    #[test]
    fn flag_labels_match_serialized_form() {
        for flag in FlagReason::ALL {
            let json = serde_json::to_string(&flag).unwrap();
            assert_eq!(json, format!("\"{}\"", flag.as_str()));
        }
    }
}
