pub mod accrual;
pub mod balance;
pub mod distribution;
pub mod ledger;
pub mod locks;

pub use accrual::{AccrualService, AccrualSnapshot};
pub use balance::project_balances;
pub use distribution::{MonthShare, distribute, distribute_clipped};
pub use ledger::LedgerService;
pub use locks::EmployeeLocks;

/// Defensive coercion for numeric fields of uncertain provenance:
/// NaN/infinite values read as 0 rather than poisoning a computation.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Rounds to 2 decimal places. Applied once at final aggregation, never
/// inside the per-month apportionment.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
