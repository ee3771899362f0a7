use super::SourceStore;
use crate::{error::ReconResult, types::PolicyId};

/// Per-policy premium totals from both ledgers. `None` means the id has no
/// rows on that side, which is distinct from a zero total.
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumPair {
    pub policy_id: PolicyId,
    pub premium_policy: Option<f64>,
    pub premium_gl: Option<f64>,
}

impl SourceStore {
    /// Full outer join of the grouped premium sums, keyed by policy_id.
    ///
    /// TOTAL() skips null premiums and yields 0.0 for a group with no
    /// non-null values, so presence alone decides whether a side is `None`.
    pub fn premium_pairs(&self) -> ReconResult<Vec<PremiumPair>> {
        let mut stmt = self.conn.prepare(
            "WITH policy_premium AS (
                 SELECT policy_id, TOTAL(written_premium) AS premium_policy
                 FROM policies
                 GROUP BY policy_id
             ),
             gl_premium AS (
                 SELECT policy_id, TOTAL(premium_booked) AS premium_gl
                 FROM accounting_gl
                 GROUP BY policy_id
             ),
             all_ids AS (
                 SELECT policy_id FROM policy_premium
                 UNION
                 SELECT policy_id FROM gl_premium
             )
             SELECT a.policy_id, p.premium_policy, g.premium_gl
             FROM all_ids a
             LEFT JOIN policy_premium p ON a.policy_id = p.policy_id
             LEFT JOIN gl_premium g     ON a.policy_id = g.policy_id
             WHERE a.policy_id IS NOT NULL
             ORDER BY a.policy_id ASC",
        )?;
        let pairs = stmt
            .query_map([], |row| {
                Ok(PremiumPair {
                    policy_id: row.get(0)?,
                    premium_policy: row.get(1)?,
                    premium_gl: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pairs)
    }
}
