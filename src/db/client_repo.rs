// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::billing::Client};

// Todas as leituras e escritas são amarradas ao company_id do contexto:
// cliente de outra empresa simplesmente não existe para o chamador.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        document_number: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (company_id, name, document_number, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(document_number)
        .bind(email)
        .bind(phone)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // (company_id, document_number) é único por empresa
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "Documento '{}' já cadastrado",
                        document_number
                    ));
                }
            }
            e.into()
        })
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(client_id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    pub async fn find_by_document<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        document_number: &str,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE company_id = $1 AND document_number = $2",
        )
        .bind(company_id)
        .bind(document_number)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    /// Preenche contato vazio com dados vindos de um documento importado.
    /// Campos já preenchidos nunca são sobrescritos por importação.
    pub async fn fill_blank_contact<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        client_id: Uuid,
        email: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE clients
            SET email = COALESCE(email, $3), updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(client_id)
        .bind(email)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Busca simples de todos os clientes da empresa
    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }
}
