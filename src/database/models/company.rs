use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub leave_rate_per_month: f64,
    pub leave_total_annual: f64,
    pub leave_applicable_from: Option<NaiveDate>,
    pub cap_paid_days: f64,
    pub cap_casual_days: f64,
    pub cap_sick_days: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company leave policy as consumed by the accrual engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeavePolicy {
    pub rate_per_month: f64,
    pub total_annual: f64,
    pub applicable_from: Option<NaiveDate>,
    pub type_caps: LeaveTypeCaps,
}

/// Per-type entitlement caps shown against usage in balance displays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LeaveTypeCaps {
    pub paid: f64,
    pub casual: f64,
    pub sick: f64,
}

impl Company {
    /// The configured leave policy, or `None` when the company has not
    /// set one up. A non-positive rate or annual total disables
    /// automatic accrual entirely.
    pub fn leave_policy(&self) -> Option<LeavePolicy> {
        let policy = LeavePolicy {
            rate_per_month: self.leave_rate_per_month,
            total_annual: self.leave_total_annual,
            applicable_from: self.leave_applicable_from,
            type_caps: LeaveTypeCaps {
                paid: self.cap_paid_days,
                casual: self.cap_casual_days,
                sick: self.cap_sick_days,
            },
        };
        policy.is_active().then_some(policy)
    }
}

impl LeavePolicy {
    pub fn is_active(&self) -> bool {
        self.rate_per_month.is_finite()
            && self.total_annual.is_finite()
            && self.rate_per_month > 0.0
            && self.total_annual > 0.0
    }
}
