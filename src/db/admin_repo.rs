// src/db/admin_repo.rs

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{PgPool, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, models::certificate::Certificate};

// O repositório privilegiado: é o ÚNICO código que enxerga dados de todas
// as empresas, e o conjunto de métodos abaixo é a allow-list completa —
// inspeção de schema e limpeza de certificados vencidos. Nenhum outro
// caminho do sistema deve usá-lo; a segregação é por interface, não por
// flag em runtime.
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaColumn {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inspeção do schema público (diagnóstico operacional).
    pub async fn list_schema(&self) -> Result<Vec<SchemaColumn>, AppError> {
        let columns = sqlx::query_as::<_, SchemaColumn>(
            r#"
            SELECT table_name::text, column_name::text, data_type::text
            FROM information_schema.columns
            WHERE table_schema = 'public'
            ORDER BY table_name, ordinal_position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(columns)
    }

    /// Certificados vencidos de TODAS as empresas.
    pub async fn find_expired_certificates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<Certificate>, AppError> {
        let certificates = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE expires_at IS NOT NULL AND expires_at < $1",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(certificates)
    }

    pub async fn delete_certificate(&self, certificate_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
            .bind(certificate_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
