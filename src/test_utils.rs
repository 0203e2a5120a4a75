//! In-memory store implementations and fixture builders shared by the
//! integration tests. Not part of the engine's public contract.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    Company, Employee, Leave, LeaveAllocations, LeaveBalances, LeaveStatus, LeaveUsage,
    UnpaidDeductionEntry, YearMonth,
};
use crate::database::stores::{DeductionStore, EmployeeStore, LeaveStore};
use crate::error::EngineError;

#[derive(Default)]
pub struct InMemoryEmployeeStore {
    employees: Mutex<HashMap<Uuid, Employee>>,
    saves: AtomicUsize,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, employee: Employee) {
        self.employees
            .lock()
            .expect("employee store lock")
            .insert(employee.id, employee);
    }

    pub fn get(&self, employee_id: Uuid) -> Option<Employee> {
        self.employees
            .lock()
            .expect("employee store lock")
            .get(&employee_id)
            .cloned()
    }

    /// Number of `save_accrual` calls seen so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn find_by_id(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, EngineError> {
        Ok(self
            .get(employee_id)
            .filter(|e| e.company_id == company_id))
    }

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Employee>, EngineError> {
        let mut employees: Vec<Employee> = self
            .employees
            .lock()
            .expect("employee store lock")
            .values()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn save_accrual(&self, employee: &Employee) -> Result<(), EngineError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut employees = self.employees.lock().expect("employee store lock");
        match employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee.clone();
                Ok(())
            }
            None => Err(EngineError::NotFound(format!(
                "Employee {} not found",
                employee.id
            ))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryLeaveStore {
    leaves: Mutex<Vec<Leave>>,
}

impl InMemoryLeaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, leave: Leave) {
        self.leaves.lock().expect("leave store lock").push(leave);
    }
}

#[async_trait]
impl LeaveStore for InMemoryLeaveStore {
    async fn find_approved_overlapping(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<Leave>, EngineError> {
        Ok(self
            .leaves
            .lock()
            .expect("leave store lock")
            .iter()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.company_id == company_id
                    && l.status == LeaveStatus::Approved
                    && l.start_date <= range_end
                    && l.end_date >= range_start
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryDeductionStore {
    entries: Mutex<HashMap<(Uuid, YearMonth), UnpaidDeductionEntry>>,
}

impl InMemoryDeductionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, employee_id: Uuid, month: YearMonth) -> Option<UnpaidDeductionEntry> {
        self.entries
            .lock()
            .expect("deduction store lock")
            .get(&(employee_id, month))
            .cloned()
    }
}

#[async_trait]
impl DeductionStore for InMemoryDeductionStore {
    async fn find_entry(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
    ) -> Result<Option<UnpaidDeductionEntry>, EngineError> {
        Ok(self
            .get(employee_id, month)
            .filter(|e| e.company_id == company_id))
    }

    async fn upsert_entry(&self, entry: &UnpaidDeductionEntry) -> Result<(), EngineError> {
        self.entries
            .lock()
            .expect("deduction store lock")
            .insert((entry.employee_id, entry.month), entry.clone());
        Ok(())
    }
}

pub fn company_with_policy(
    rate_per_month: f64,
    total_annual: f64,
    applicable_from: Option<NaiveDate>,
) -> Company {
    let now = Utc::now();
    Company {
        id: Uuid::new_v4(),
        name: "Test Company".to_string(),
        leave_rate_per_month: rate_per_month,
        leave_total_annual: total_annual,
        leave_applicable_from: applicable_from,
        cap_paid_days: 12.0,
        cap_casual_days: 6.0,
        cap_sick_days: 6.0,
        created_at: now,
        updated_at: now,
    }
}

pub fn employee(company_id: Uuid, joining_date: Option<NaiveDate>) -> Employee {
    let now = Utc::now();
    Employee {
        id: Uuid::new_v4(),
        company_id,
        name: "Test Employee".to_string(),
        joining_date,
        leave_usage: LeaveUsage::default(),
        leave_balances: LeaveBalances::default(),
        manual_adjustment: 0.0,
        total_leave_available: 0.0,
        last_accrued_month: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn approved_leave(
    employee_id: Uuid,
    company_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    allocations: LeaveAllocations,
) -> Leave {
    let now = Utc::now();
    Leave {
        id: Uuid::new_v4(),
        employee_id,
        company_id,
        start_date,
        end_date,
        status: LeaveStatus::Approved,
        allocations,
        created_at: now,
        updated_at: now,
    }
}
