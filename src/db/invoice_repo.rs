// src/db/invoice_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{Invoice, InvoiceItem, InvoiceStatus, InvoiceWithClient, NewInvoiceItem},
};

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA (sempre dentro de transação no serviço)
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        client_id: Uuid,
        invoice_number: &str,
        fiscal_document_key: Option<&str>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        total_amount: Decimal,
        created_by: Uuid,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                company_id, client_id, invoice_number, fiscal_document_key,
                issue_date, due_date, total_amount, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(client_id)
        .bind(invoice_number)
        .bind(fiscal_document_key)
        .bind(issue_date)
        .bind(due_date)
        .bind(total_amount)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // (company_id, fiscal_document_key) é a chave de deduplicação
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Documento fiscal já registrado para esta empresa".to_string(),
                    );
                }
            }
            e.into()
        })
    }

    // Recebe a conexão da transação direto: o loop precisa re-emprestar o
    // executor a cada item.
    pub async fn insert_items(
        &self,
        conn: &mut sqlx::PgConnection,
        company_id: Uuid,
        invoice_id: Uuid,
        items: &[NewInvoiceItem],
    ) -> Result<(), AppError> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, company_id, description, quantity, unit_price, total)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(invoice_id)
            .bind(company_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Trava a linha da fatura (`FOR UPDATE`) dentro da transação atual.
    /// É o que serializa o par inserir-pagamento/recalcular-status.
    pub async fn lock_for_update<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE company_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(company_id)
        .bind(invoice_id)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn find_by_fiscal_key<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        fiscal_key: &str,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE company_id = $1 AND fiscal_document_key = $2",
        )
        .bind(company_id)
        .bind(fiscal_key)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE invoices SET status = $3, updated_at = NOW() WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(invoice_id)
        .bind(status)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete_items<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM invoice_items WHERE company_id = $1 AND invoice_id = $2")
                .bind(company_id)
                .bind(invoice_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM invoices WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(invoice_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Listagem da empresa com o resumo do cliente embutido, mais recente
    /// primeiro.
    pub async fn list_with_client(
        &self,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<InvoiceWithClient>, AppError> {
        let invoices = sqlx::query_as::<_, InvoiceWithClient>(
            r#"
            SELECT
                i.id, i.client_id, i.invoice_number, i.fiscal_document_key,
                i.issue_date, i.due_date, i.total_amount, i.status,
                c.name AS client_name, c.document_number AS client_document,
                i.created_at
            FROM invoices i
            INNER JOIN clients c ON c.id = i.client_id
            WHERE i.company_id = $1
            ORDER BY i.issue_date DESC, i.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn list_items(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Vec<InvoiceItem>, AppError> {
        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT * FROM invoice_items WHERE company_id = $1 AND invoice_id = $2",
        )
        .bind(company_id)
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
