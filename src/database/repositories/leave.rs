use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Leave, LeaveStatus};
use crate::database::stores::LeaveStore;
use crate::database::utils::sql;
use crate::error::EngineError;

const LEAVE_COLUMNS: &str = r#"
    id,
    employee_id,
    company_id,
    start_date,
    end_date,
    status,
    alloc_paid_days,
    alloc_casual_days,
    alloc_sick_days,
    alloc_unpaid_days,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a decided leave request.
    pub async fn create(&self, leave: &Leave) -> Result<(), EngineError> {
        sqlx::query(&sql(r#"
            INSERT INTO
                leaves (
                    id,
                    employee_id,
                    company_id,
                    start_date,
                    end_date,
                    status,
                    alloc_paid_days,
                    alloc_casual_days,
                    alloc_sick_days,
                    alloc_unpaid_days,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(leave.id)
        .bind(leave.employee_id)
        .bind(leave.company_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(leave.status)
        .bind(leave.allocations.paid)
        .bind(leave.allocations.casual)
        .bind(leave.allocations.sick)
        .bind(leave.allocations.unpaid)
        .bind(leave.created_at)
        .bind(leave.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LeaveStore for LeaveRepository {
    async fn find_approved_overlapping(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<Leave>, EngineError> {
        let query = format!(
            r#"
            SELECT {}
            FROM leaves
            WHERE
                employee_id = ?
                AND company_id = ?
                AND status = ?
                AND start_date <= ?
                AND end_date >= ?
            ORDER BY start_date
            "#,
            LEAVE_COLUMNS
        );

        let leaves = sqlx::query_as::<_, Leave>(&sql(&query))
            .bind(employee_id)
            .bind(company_id)
            .bind(LeaveStatus::Approved)
            .bind(range_end)
            .bind(range_start)
            .fetch_all(&self.pool)
            .await?;

        Ok(leaves)
    }
}
