pub mod config;
pub mod database;
pub mod error;
pub mod services;
pub mod test_utils;

use std::sync::Arc;

use sqlx::PgPool;

pub use config::Config;
pub use database::repositories::{DeductionRepository, EmployeeRepository, LeaveRepository};
pub use error::EngineError;
pub use services::{AccrualService, LedgerService};

/// The wired engine: accrual and ledger services over one database
/// pool, sharing a per-employee lock map.
pub struct Engine {
    pub accrual: AccrualService,
    pub ledger: LedgerService,
}

impl Engine {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let locks = services::EmployeeLocks::new();
        let employees: Arc<EmployeeRepository> = Arc::new(EmployeeRepository::new(pool.clone()));
        let leaves = Arc::new(LeaveRepository::new(pool.clone()));
        let entries = Arc::new(DeductionRepository::new(pool));

        Self {
            accrual: AccrualService::new(employees.clone(), locks.clone()),
            ledger: LedgerService::new(
                leaves,
                entries,
                employees,
                locks,
                config.max_monthly_deduction,
            ),
        }
    }
}
