use std::sync::Arc;

use chrono::NaiveDate;

use leave_engine::database::models::YearMonth;
use leave_engine::services::{AccrualService, EmployeeLocks, LedgerService};
use leave_engine::test_utils::{
    InMemoryDeductionStore, InMemoryEmployeeStore, InMemoryLeaveStore,
};

/// Engine wired over in-memory stores, with handles kept for
/// inspecting persisted state.
pub struct TestEngine {
    pub accrual: AccrualService,
    pub ledger: LedgerService,
    pub employees: Arc<InMemoryEmployeeStore>,
    pub leaves: Arc<InMemoryLeaveStore>,
    pub entries: Arc<InMemoryDeductionStore>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_deduction_cap(None)
    }

    pub fn with_deduction_cap(max_monthly_deduction: Option<f64>) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let locks = EmployeeLocks::new();
        let employees = Arc::new(InMemoryEmployeeStore::new());
        let leaves = Arc::new(InMemoryLeaveStore::new());
        let entries = Arc::new(InMemoryDeductionStore::new());

        Self {
            accrual: AccrualService::new(employees.clone(), locks.clone()),
            ledger: LedgerService::new(
                leaves.clone(),
                entries.clone(),
                employees.clone(),
                locks,
                max_monthly_deduction,
            ),
            employees,
            leaves,
            entries,
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn month(s: &str) -> YearMonth {
    s.parse().unwrap()
}
