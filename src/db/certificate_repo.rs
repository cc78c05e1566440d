// src/db/certificate_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::certificate::Certificate};

#[derive(Clone)]
pub struct CertificateRepository {
    pool: PgPool,
}

impl CertificateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        file_url: &str,
        expires_at: Option<NaiveDate>,
    ) -> Result<Certificate, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (company_id, name, file_url, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(file_url)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;

        Ok(certificate)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        certificate_id: Uuid,
    ) -> Result<Option<Certificate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let certificate = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(certificate_id)
        .fetch_optional(executor)
        .await?;

        Ok(certificate)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        certificate_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM certificates WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(certificate_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Certificate>, AppError> {
        let certificates = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(certificates)
    }
}
