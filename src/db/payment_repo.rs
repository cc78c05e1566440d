// src/db/payment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{Payment, PaymentMethod},
};

// Razão append-only: só INSERT e leitura. A única deleção possível é a
// cascata da exclusão da própria fatura.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
        payment_date: NaiveDate,
        method: PaymentMethod,
        notes: Option<&str>,
        reversal_of: Option<Uuid>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                invoice_id, company_id, amount, payment_date, method, notes, reversal_of
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(company_id)
        .bind(amount)
        .bind(payment_date)
        .bind(method)
        .bind(notes)
        .bind(reversal_of)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Índice parcial: um pagamento só pode ser estornado uma vez
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Pagamento já estornado".to_string());
                }
            }
            e.into()
        })
    }

    /// Soma do razão da fatura, lida na MESMA transação que segura o lock
    /// da linha — é isso que impede dois pagamentos concorrentes de
    /// enxergarem uma soma defasada.
    pub async fn paid_sum<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sum: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(amount) FROM payments WHERE company_id = $1 AND invoice_id = $2",
        )
        .bind(company_id)
        .bind(invoice_id)
        .fetch_one(executor)
        .await?;

        Ok(sum.unwrap_or(Decimal::ZERO))
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(payment_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// Existe estorno apontando para este pagamento?
    pub async fn has_reversal<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        payment_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM payments WHERE company_id = $1 AND reversal_of = $2)",
        )
        .bind(company_id)
        .bind(payment_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Cascata da exclusão de fatura; nunca chamado fora dela.
    pub async fn delete_for_invoice<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM payments WHERE company_id = $1 AND invoice_id = $2")
                .bind(company_id)
                .bind(invoice_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_for_invoice(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE company_id = $1 AND invoice_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(company_id)
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
