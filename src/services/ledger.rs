use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{UnpaidDeductionEntry, YearMonth};
use crate::database::stores::{DeductionStore, EmployeeStore, LeaveStore};
use crate::error::EngineError;

use super::distribution::distribute_clipped;
use super::locks::EmployeeLocks;
use super::round2;

const DAY_EPSILON: f64 = 1e-9;

/// Reconciles the unpaid portion of approved leaves against a
/// carry-forward ledger of per-month payroll deductions.
pub struct LedgerService {
    leaves: Arc<dyn LeaveStore>,
    entries: Arc<dyn DeductionStore>,
    employees: Arc<dyn EmployeeStore>,
    locks: EmployeeLocks,
    /// Optional per-month deduction cap from configuration.
    max_monthly_deduction: Option<f64>,
}

impl LedgerService {
    pub fn new(
        leaves: Arc<dyn LeaveStore>,
        entries: Arc<dyn DeductionStore>,
        employees: Arc<dyn EmployeeStore>,
        locks: EmployeeLocks,
        max_monthly_deduction: Option<f64>,
    ) -> Self {
        Self {
            leaves,
            entries,
            employees,
            locks,
            max_monthly_deduction,
        }
    }

    /// Unpaid days attributable to one payroll month, summed across all
    /// approved leaves overlapping it, clipped to the employment start.
    ///
    /// A malformed month string yields 0 rather than an error; store
    /// failures propagate.
    pub async fn unpaid_taken_for_month(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: &str,
        employment_start: Option<NaiveDate>,
    ) -> Result<f64, EngineError> {
        let Ok(month) = month.parse::<YearMonth>() else {
            log::warn!("malformed payroll month {:?}, treating as zero", month);
            return Ok(0.0);
        };
        self.unpaid_taken(employee_id, company_id, month, employment_start)
            .await
    }

    async fn unpaid_taken(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
        employment_start: Option<NaiveDate>,
    ) -> Result<f64, EngineError> {
        let month_start = month.first_day();
        let month_end = month.last_day();

        if employment_start.is_some_and(|start| start > month_end) {
            // Not yet employed during the target month.
            return Ok(0.0);
        }

        let leaves = self
            .leaves
            .find_approved_overlapping(employee_id, company_id, month_start, month_end)
            .await?;

        let mut total = 0.0;
        for leave in &leaves {
            let clip = employment_start.unwrap_or(leave.start_date);
            if leave.end_date < clip {
                // Ended before the employee was hired.
                continue;
            }
            if let Some(share) = distribute_clipped(leave, clip).get(&month) {
                total += share.unpaid;
            }
        }

        // Rounded once across all leaves, not per leave.
        Ok(round2(total))
    }

    /// Computes and upserts the ledger entry for one employee-month.
    ///
    /// `taken`, `carry_before` and `carry_after` are recomputed; an
    /// existing admin-entered `deducted` is preserved untouched.
    pub async fn entry_for_month(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
        employment_start: Option<NaiveDate>,
    ) -> Result<UnpaidDeductionEntry, EngineError> {
        let _guard = self.locks.acquire(employee_id).await;
        self.reconcile(employee_id, company_id, month, employment_start, None)
            .await
    }

    /// Stores an admin-chosen deduction for one employee-month and
    /// returns the reconciled entry. Rejects figures outside
    /// `[0, max_deductable]`.
    pub async fn save_deduction(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
        deducted: f64,
    ) -> Result<UnpaidDeductionEntry, EngineError> {
        if !deducted.is_finite() || deducted < 0.0 {
            return Err(EngineError::BadRequest(format!(
                "Invalid deduction amount: {}",
                deducted
            )));
        }

        let employee = self
            .employees
            .find_by_id(employee_id, company_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Employee {} not found", employee_id)))?;

        let _guard = self.locks.acquire(employee_id).await;
        self.reconcile(
            employee_id,
            company_id,
            month,
            employee.joining_date,
            Some(round2(deducted)),
        )
        .await
    }

    /// The payroll-report sweep: reconciled entries for every employee
    /// of a company for one month.
    pub async fn entries_for_company_month(
        &self,
        company_id: Uuid,
        month: YearMonth,
    ) -> Result<Vec<UnpaidDeductionEntry>, EngineError> {
        let employees = self.employees.list_for_company(company_id).await?;

        let mut entries = Vec::with_capacity(employees.len());
        for employee in &employees {
            let entry = self
                .entry_for_month(employee.id, company_id, month, employee.joining_date)
                .await?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Recomputes one entry and upserts it. Caller holds the employee
    /// lock. `new_deducted` is `Some` only on the admin save path.
    async fn reconcile(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
        employment_start: Option<NaiveDate>,
        new_deducted: Option<f64>,
    ) -> Result<UnpaidDeductionEntry, EngineError> {
        let taken = self
            .unpaid_taken(employee_id, company_id, month, employment_start)
            .await?;

        let carry_before = match self
            .entries
            .find_entry(employee_id, company_id, month.pred())
            .await?
        {
            Some(prev) => prev.carry_after,
            None => 0.0,
        };

        let max_deductable = round2(carry_before + taken);
        let available = match self.max_monthly_deduction {
            Some(cap) => max_deductable.min(cap),
            None => max_deductable,
        };

        let deducted = match new_deducted {
            Some(value) => {
                if value > max_deductable + DAY_EPSILON {
                    return Err(EngineError::BadRequest(format!(
                        "Deduction {} exceeds deductable amount {}",
                        value, max_deductable
                    )));
                }
                value
            }
            None => {
                let existing = self
                    .entries
                    .find_entry(employee_id, company_id, month)
                    .await?
                    .map(|e| e.deducted)
                    .unwrap_or(0.0);
                if existing > max_deductable + DAY_EPSILON {
                    log::warn!(
                        "deduction {} for employee {} month {} exceeds recomputed deductable {}",
                        existing,
                        employee_id,
                        month,
                        max_deductable
                    );
                }
                existing
            }
        };

        let entry = UnpaidDeductionEntry {
            employee_id,
            company_id,
            month,
            taken,
            carry_before,
            available,
            deducted,
            carry_after: round2((carry_before + taken - deducted).max(0.0)),
            max_deductable,
            updated_at: Utc::now(),
        };
        self.entries.upsert_entry(&entry).await?;

        Ok(entry)
    }
}
