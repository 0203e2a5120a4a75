use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::YearMonth;

/// One unpaid-deduction ledger row per employee per payroll month.
///
/// `taken` and the carry figures are recomputed on every read;
/// `deducted` is admin-entered and survives recomputation untouched.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidDeductionEntry {
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub month: YearMonth,
    /// Unpaid days attributable to this month per the distributor.
    pub taken: f64,
    /// Undeducted balance rolled from the prior month.
    pub carry_before: f64,
    /// Deduction capacity offered to the admin for this run.
    pub available: f64,
    /// Admin-chosen figure, at most `max_deductable`.
    pub deducted: f64,
    /// Rolled to the next month: max(0, carry_before + taken - deducted).
    pub carry_after: f64,
    pub max_deductable: f64,
    pub updated_at: DateTime<Utc>,
}
