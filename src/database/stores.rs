use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{Employee, Leave, UnpaidDeductionEntry, YearMonth};
use crate::error::EngineError;

/// Read/write access to the employee aggregate. The engine performs
/// exactly one `save_accrual` write per accrual run.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_id(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, EngineError>;

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Employee>, EngineError>;

    /// Persists the derived accrual fields and balances of an employee.
    async fn save_accrual(&self, employee: &Employee) -> Result<(), EngineError>;
}

/// Query capability over decided leave requests.
#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Approved leaves for the employee whose `[start_date, end_date]`
    /// overlaps `[range_start, range_end]`.
    async fn find_approved_overlapping(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<Leave>, EngineError>;
}

/// Persistence for the per-employee-month deduction ledger.
#[async_trait]
pub trait DeductionStore: Send + Sync {
    async fn find_entry(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
    ) -> Result<Option<UnpaidDeductionEntry>, EngineError>;

    async fn upsert_entry(&self, entry: &UnpaidDeductionEntry) -> Result<(), EngineError>;
}
