use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{UnpaidDeductionEntry, YearMonth};
use crate::database::stores::DeductionStore;
use crate::database::utils::sql;
use crate::error::EngineError;

#[derive(Clone)]
pub struct DeductionRepository {
    pool: PgPool,
}

impl DeductionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeductionStore for DeductionRepository {
    async fn find_entry(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        month: YearMonth,
    ) -> Result<Option<UnpaidDeductionEntry>, EngineError> {
        let entry = sqlx::query_as::<_, UnpaidDeductionEntry>(&sql(r#"
            SELECT
                employee_id,
                company_id,
                month,
                taken,
                carry_before,
                available,
                deducted,
                carry_after,
                max_deductable,
                updated_at
            FROM
                unpaid_deduction_entries
            WHERE
                employee_id = ?
                AND company_id = ?
                AND month = ?
        "#))
        .bind(employee_id)
        .bind(company_id)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn upsert_entry(&self, entry: &UnpaidDeductionEntry) -> Result<(), EngineError> {
        sqlx::query(&sql(r#"
            INSERT INTO
                unpaid_deduction_entries (
                    employee_id,
                    company_id,
                    month,
                    taken,
                    carry_before,
                    available,
                    deducted,
                    carry_after,
                    max_deductable,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (employee_id, month) DO UPDATE
            SET
                taken = EXCLUDED.taken,
                carry_before = EXCLUDED.carry_before,
                available = EXCLUDED.available,
                deducted = EXCLUDED.deducted,
                carry_after = EXCLUDED.carry_after,
                max_deductable = EXCLUDED.max_deductable,
                updated_at = EXCLUDED.updated_at
        "#))
        .bind(entry.employee_id)
        .bind(entry.company_id)
        .bind(entry.month)
        .bind(entry.taken)
        .bind(entry.carry_before)
        .bind(entry.available)
        .bind(entry.deducted)
        .bind(entry.carry_after)
        .bind(entry.max_deductable)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
