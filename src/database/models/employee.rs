use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::YearMonth;

/// Cumulative leave days consumed per type. These only grow, except
/// through explicit corrections upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveUsage {
    #[sqlx(rename = "used_paid_days")]
    pub paid: f64,
    #[sqlx(rename = "used_casual_days")]
    pub casual: f64,
    #[sqlx(rename = "used_sick_days")]
    pub sick: f64,
    #[sqlx(rename = "used_unpaid_days")]
    pub unpaid: f64,
}

/// Derived per-type balance snapshot shown in the UI. The unpaid field
/// is days already taken unpaid, not a remaining capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveBalances {
    #[sqlx(rename = "balance_paid_days")]
    pub paid: f64,
    #[sqlx(rename = "balance_casual_days")]
    pub casual: f64,
    #[sqlx(rename = "balance_sick_days")]
    pub sick: f64,
    #[sqlx(rename = "balance_unpaid_days")]
    pub unpaid: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub joining_date: Option<NaiveDate>,
    #[sqlx(flatten)]
    pub leave_usage: LeaveUsage,
    #[sqlx(flatten)]
    pub leave_balances: LeaveBalances,
    /// Operator-entered additive correction. Read by accrual runs,
    /// changed only through an explicit admin edit.
    pub manual_adjustment: f64,
    /// Derived total, overwritten on every accrual run.
    pub total_leave_available: f64,
    pub last_accrued_month: Option<YearMonth>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveUsage {
    /// Days counted against the annual entitlement. Unpaid leave does
    /// not consume it.
    pub fn counted_against_entitlement(&self) -> f64 {
        let num = |v: f64| if v.is_finite() { v } else { 0.0 };
        num(self.paid) + num(self.casual) + num(self.sick)
    }
}
