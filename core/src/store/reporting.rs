use super::SourceStore;
use crate::error::ReconResult;

/// Premium totals for one (booking_date, state) group of the inner join.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingStateTotals {
    pub booking_date: Option<String>,
    pub state: Option<String>,
    pub total_policy_premium: f64,
    pub total_gl_premium: f64,
}

impl SourceStore {
    /// Inner join of policies and GL on policy_id, grouped by the GL booking
    /// date and the policy state. Each GL entry yields one joined row, so a
    /// policy's written premium is counted once per matching entry.
    pub fn booking_state_totals(&self) -> ReconResult<Vec<BookingStateTotals>> {
        let mut stmt = self.conn.prepare(
            "WITH joined AS (
                 SELECT
                     COALESCE(DATE(gl.booking_date), gl.booking_date) AS booking_date,
                     p.state,
                     p.written_premium,
                     gl.premium_booked
                 FROM policies p
                 JOIN accounting_gl gl
                   ON p.policy_id = gl.policy_id
             )
             SELECT
                 booking_date,
                 state,
                 TOTAL(written_premium) AS total_policy_premium,
                 TOTAL(premium_booked)  AS total_gl_premium
             FROM joined
             GROUP BY booking_date, state
             ORDER BY booking_date ASC, state ASC",
        )?;
        let totals = stmt
            .query_map([], |row| {
                Ok(BookingStateTotals {
                    booking_date: row.get(0)?,
                    state: row.get(1)?,
                    total_policy_premium: row.get(2)?,
                    total_gl_premium: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(totals)
    }
}
