use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{Employee, LeavePolicy, YearMonth};
use crate::database::stores::EmployeeStore;
use crate::error::EngineError;

use super::balance::project_balances;
use super::finite_or_zero;
use super::locks::EmployeeLocks;

/// The result of one accrual computation, separate from its persistence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualSnapshot {
    pub start_month: YearMonth,
    pub as_of_month: YearMonth,
    pub months_elapsed: i64,
    pub potential: f64,
    pub base: f64,
    pub total_available: f64,
}

/// The date an employee starts accruing under a policy.
///
/// When both the policy start and the joining date are present and the
/// policy starts later, the policy start wins; otherwise the precedence
/// is joining date, then policy start, then the record creation date.
pub fn resolve_accrual_start(
    policy: &LeavePolicy,
    joining_date: Option<NaiveDate>,
    created_at: NaiveDate,
) -> NaiveDate {
    match (joining_date, policy.applicable_from) {
        (Some(joined), Some(from)) if from > joined => from,
        (Some(joined), _) => joined,
        (None, Some(from)) => from,
        (None, None) => created_at,
    }
}

/// Pure accrual computation for an employee under an active policy as
/// of a given date. Deterministic: identical inputs yield an identical
/// snapshot.
pub fn compute(employee: &Employee, policy: &LeavePolicy, as_of: NaiveDate) -> AccrualSnapshot {
    let as_of_month = YearMonth::from_date(as_of);
    let start = resolve_accrual_start(
        policy,
        employee.joining_date,
        employee.created_at.date_naive(),
    );
    let start_month = YearMonth::from_date(start);

    // Counted from the month immediately preceding the accrual start,
    // so the start month itself earns a full increment.
    let months_elapsed = if start_month > as_of_month {
        0
    } else {
        as_of_month.months_since(start_month.pred()).max(0)
    };

    let potential = policy.rate_per_month * months_elapsed as f64;
    let used = employee.leave_usage.counted_against_entitlement();
    let max_base = (policy.total_annual - used).max(0.0);
    let base = potential.clamp(0.0, max_base);
    let total_available = base + finite_or_zero(employee.manual_adjustment);

    AccrualSnapshot {
        start_month,
        as_of_month,
        months_elapsed,
        potential,
        base,
        total_available,
    }
}

/// Runs accrual computations and persists their outcome, one store
/// write per call, serialized per employee.
pub struct AccrualService {
    store: Arc<dyn EmployeeStore>,
    locks: EmployeeLocks,
}

impl AccrualService {
    pub fn new(store: Arc<dyn EmployeeStore>, locks: EmployeeLocks) -> Self {
        Self { store, locks }
    }

    /// Recomputes the accrued total and persists it onto the employee.
    /// A missing or degenerate policy makes this a silent no-op: the
    /// system keeps functioning for companies without leave config.
    pub async fn accrue(
        &self,
        employee: &mut Employee,
        policy: Option<&LeavePolicy>,
        as_of: NaiveDate,
    ) -> Result<(), EngineError> {
        let Some(policy) = active(policy) else {
            log::debug!("no active leave policy for employee {}", employee.id);
            return Ok(());
        };

        let _guard = self.locks.acquire(employee.id).await;
        apply(employee, policy, as_of);
        self.store.save_accrual(employee).await
    }

    /// The lazy balance-read path: recomputes the accrued total and the
    /// per-type display balances in a single persisted write.
    pub async fn refresh_balances(
        &self,
        employee: &mut Employee,
        policy: Option<&LeavePolicy>,
        as_of: NaiveDate,
    ) -> Result<(), EngineError> {
        let _guard = self.locks.acquire(employee.id).await;

        let caps = match active(policy) {
            Some(policy) => {
                apply(employee, policy, as_of);
                policy.type_caps
            }
            None => Default::default(),
        };
        employee.leave_balances = project_balances(&caps, &employee.leave_usage);
        self.store.save_accrual(employee).await
    }

    /// Explicit admin edit of the additive manual adjustment — the only
    /// path that may change it. Recomputes the total before persisting;
    /// without an active policy the total is the adjustment alone.
    pub async fn set_manual_adjustment(
        &self,
        employee: &mut Employee,
        policy: Option<&LeavePolicy>,
        adjustment: f64,
        as_of: NaiveDate,
    ) -> Result<(), EngineError> {
        let _guard = self.locks.acquire(employee.id).await;

        employee.manual_adjustment = finite_or_zero(adjustment);
        match active(policy) {
            Some(policy) => apply(employee, policy, as_of),
            None => employee.total_leave_available = employee.manual_adjustment,
        }
        self.store.save_accrual(employee).await
    }

    /// Convenience lookup used by callers that only hold ids.
    pub async fn load_employee(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
    ) -> Result<Employee, EngineError> {
        self.store
            .find_by_id(employee_id, company_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Employee {} not found", employee_id)))
    }
}

fn active(policy: Option<&LeavePolicy>) -> Option<&LeavePolicy> {
    policy.filter(|p| p.is_active())
}

fn apply(employee: &mut Employee, policy: &LeavePolicy, as_of: NaiveDate) {
    let snapshot = compute(employee, policy, as_of);
    employee.total_leave_available = snapshot.total_available;
    employee.last_accrued_month = Some(snapshot.as_of_month);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::database::models::{LeaveBalances, LeaveTypeCaps, LeaveUsage};

    fn policy(rate: f64, annual: f64, applicable_from: Option<NaiveDate>) -> LeavePolicy {
        LeavePolicy {
            rate_per_month: rate,
            total_annual: annual,
            applicable_from,
            type_caps: LeaveTypeCaps::default(),
        }
    }

    fn employee(joining: Option<NaiveDate>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "Test Employee".to_string(),
            joining_date: joining,
            leave_usage: LeaveUsage::default(),
            leave_balances: LeaveBalances::default(),
            manual_adjustment: 0.0,
            total_leave_available: 0.0,
            last_accrued_month: None,
            created_at: Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accrues_from_the_joining_month() {
        // 1.5/month, joined mid-January, read in April: Dec baseline,
        // four whole months, 6.0 days.
        let employee = employee(Some(date(2024, 1, 15)));
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 10));

        assert_eq!(snapshot.start_month.to_string(), "2024-01");
        assert_eq!(snapshot.months_elapsed, 4);
        assert_eq!(snapshot.potential, 6.0);
        assert_eq!(snapshot.base, 6.0);
        assert_eq!(snapshot.total_available, 6.0);
    }

    #[test]
    fn later_policy_start_overrides_joining_date() {
        let employee = employee(Some(date(2024, 1, 15)));
        let snapshot = compute(
            &employee,
            &policy(1.0, 18.0, Some(date(2024, 3, 1))),
            date(2024, 4, 10),
        );

        assert_eq!(snapshot.start_month.to_string(), "2024-03");
        assert_eq!(snapshot.months_elapsed, 2);
    }

    #[test]
    fn earlier_policy_start_defers_to_joining_date() {
        let employee = employee(Some(date(2024, 1, 15)));
        let snapshot = compute(
            &employee,
            &policy(1.0, 18.0, Some(date(2023, 1, 1))),
            date(2024, 4, 10),
        );

        assert_eq!(snapshot.start_month.to_string(), "2024-01");
    }

    #[test]
    fn falls_back_to_created_at_without_dates() {
        let employee = employee(None);
        let snapshot = compute(&employee, &policy(1.0, 18.0, None), date(2023, 8, 20));

        // created_at is 2023-06-01
        assert_eq!(snapshot.start_month.to_string(), "2023-06");
        assert_eq!(snapshot.months_elapsed, 3);
    }

    #[test]
    fn start_after_as_of_accrues_nothing() {
        let mut employee = employee(Some(date(2025, 2, 1)));
        employee.manual_adjustment = 1.5;
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 10));

        assert_eq!(snapshot.months_elapsed, 0);
        assert_eq!(snapshot.base, 0.0);
        assert_eq!(snapshot.total_available, 1.5);
    }

    #[test]
    fn usage_shrinks_the_cap() {
        let mut employee = employee(Some(date(2023, 1, 1)));
        employee.leave_usage = LeaveUsage {
            paid: 10.0,
            casual: 4.0,
            sick: 2.0,
            unpaid: 30.0, // must not count
        };
        // 16 months elapsed at 1.5 => potential 24, but annual 18 - 16 used = 2
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 10));

        assert_eq!(snapshot.base, 2.0);
    }

    #[test]
    fn exhausted_entitlement_floors_at_zero() {
        let mut employee = employee(Some(date(2023, 1, 1)));
        employee.leave_usage = LeaveUsage {
            paid: 20.0,
            casual: 0.0,
            sick: 0.0,
            unpaid: 0.0,
        };
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 10));

        assert_eq!(snapshot.base, 0.0);
        assert_eq!(snapshot.total_available, 0.0);
    }

    #[test]
    fn manual_adjustment_is_added_not_consumed() {
        let mut employee = employee(Some(date(2024, 1, 15)));
        employee.manual_adjustment = 2.5;
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 10));

        assert_eq!(snapshot.base, 6.0);
        assert_eq!(snapshot.total_available, 8.5);
    }

    #[test]
    fn non_finite_adjustment_reads_as_zero() {
        let mut employee = employee(Some(date(2024, 1, 15)));
        employee.manual_adjustment = f64::NAN;
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 10));

        assert_eq!(snapshot.total_available, 6.0);
    }

    #[test]
    fn computation_is_idempotent() {
        let mut employee = employee(Some(date(2024, 1, 15)));
        employee.manual_adjustment = 1.0;
        let p = policy(1.5, 18.0, None);

        let first = compute(&employee, &p, date(2024, 4, 10));
        let second = compute(&employee, &p, date(2024, 4, 10));
        assert_eq!(first, second);
    }

    #[test]
    fn accrual_in_the_start_month_counts_one_month() {
        let employee = employee(Some(date(2024, 4, 25)));
        let snapshot = compute(&employee, &policy(1.5, 18.0, None), date(2024, 4, 1));

        // Start month floors to April, baseline March, one month elapsed
        // even though the joining day is after the as-of day.
        assert_eq!(snapshot.months_elapsed, 1);
        assert_eq!(snapshot.base, 1.5);
    }
}
