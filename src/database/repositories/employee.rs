use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Employee;
use crate::database::stores::EmployeeStore;
use crate::database::utils::sql;
use crate::error::EngineError;

const EMPLOYEE_COLUMNS: &str = r#"
    id,
    company_id,
    name,
    joining_date,
    used_paid_days,
    used_casual_days,
    used_sick_days,
    used_unpaid_days,
    balance_paid_days,
    balance_casual_days,
    balance_sick_days,
    balance_unpaid_days,
    manual_adjustment,
    total_leave_available,
    last_accrued_month,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new employee row.
    pub async fn create(&self, employee: &Employee) -> Result<(), EngineError> {
        sqlx::query(&sql(r#"
            INSERT INTO
                employees (
                    id,
                    company_id,
                    name,
                    joining_date,
                    used_paid_days,
                    used_casual_days,
                    used_sick_days,
                    used_unpaid_days,
                    balance_paid_days,
                    balance_casual_days,
                    balance_sick_days,
                    balance_unpaid_days,
                    manual_adjustment,
                    total_leave_available,
                    last_accrued_month,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(employee.id)
        .bind(employee.company_id)
        .bind(&employee.name)
        .bind(employee.joining_date)
        .bind(employee.leave_usage.paid)
        .bind(employee.leave_usage.casual)
        .bind(employee.leave_usage.sick)
        .bind(employee.leave_usage.unpaid)
        .bind(employee.leave_balances.paid)
        .bind(employee.leave_balances.casual)
        .bind(employee.leave_balances.sick)
        .bind(employee.leave_balances.unpaid)
        .bind(employee.manual_adjustment)
        .bind(employee.total_leave_available)
        .bind(employee.last_accrued_month)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn find_by_id(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, EngineError> {
        let query = format!(
            "SELECT {} FROM employees WHERE id = ? AND company_id = ?",
            EMPLOYEE_COLUMNS
        );
        let employee = sqlx::query_as::<_, Employee>(&sql(&query))
            .bind(employee_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Employee>, EngineError> {
        let query = format!(
            "SELECT {} FROM employees WHERE company_id = ? ORDER BY name",
            EMPLOYEE_COLUMNS
        );
        let employees = sqlx::query_as::<_, Employee>(&sql(&query))
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    async fn save_accrual(&self, employee: &Employee) -> Result<(), EngineError> {
        let now = Utc::now();

        let result = sqlx::query(&sql(r#"
            UPDATE
                employees
            SET
                balance_paid_days = ?,
                balance_casual_days = ?,
                balance_sick_days = ?,
                balance_unpaid_days = ?,
                manual_adjustment = ?,
                total_leave_available = ?,
                last_accrued_month = ?,
                updated_at = ?
            WHERE
                id = ?
                AND company_id = ?
        "#))
        .bind(employee.leave_balances.paid)
        .bind(employee.leave_balances.casual)
        .bind(employee.leave_balances.sick)
        .bind(employee.leave_balances.unpaid)
        .bind(employee.manual_adjustment)
        .bind(employee.total_leave_available)
        .bind(employee.last_accrued_month)
        .bind(now)
        .bind(employee.id)
        .bind(employee.company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!(
                "Employee {} not found",
                employee.id
            )));
        }

        Ok(())
    }
}
