// src/services/certificate_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CertificateRepository,
    models::audit::AuditAction,
    models::certificate::Certificate,
    services::{audit_service::AuditService, storage::ObjectStorage},
};

#[derive(Clone)]
pub struct CertificateService {
    repo: CertificateRepository,
    audit: AuditService,
    storage: Arc<dyn ObjectStorage>,
}

impl CertificateService {
    pub fn new(
        repo: CertificateRepository,
        audit: AuditService,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self { repo, audit, storage }
    }

    pub async fn upload<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        name: &str,
        file_name: &str,
        bytes: &[u8],
        expires_at: Option<NaiveDate>,
    ) -> Result<Certificate, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if bytes.is_empty() {
            return Err(AppError::Validation("Arquivo vazio".to_string()));
        }

        // Blob primeiro; se a linha falhar depois, sobra só um arquivo
        // órfão (barato), nunca uma linha apontando para o nada.
        let file_url = self.storage.put(bytes, file_name).await?;

        let mut tx = executor.begin().await?;

        let certificate = self
            .repo
            .insert(&mut *tx, company_id, name, &file_url, expires_at)
            .await?;

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::CertificateCreated,
                "certificate",
                certificate.id,
                json!({ "name": name, "expiresAt": expires_at }),
            )
            .await?;

        tx.commit().await?;

        Ok(certificate)
    }

    /// Apaga o blob antes da linha. Falha do blob é logada e não impede a
    /// exclusão: o custo dominante é um arquivo esquecido, não uma linha
    /// pendurada.
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        certificate_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let certificate = self
            .repo
            .find_by_id(&mut *tx, company_id, certificate_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Err(e) = self.storage.delete(&certificate.file_url).await {
            tracing::warn!(
                certificate_id = %certificate.id,
                "Falha ao remover blob do certificado (seguindo mesmo assim): {e:?}"
            );
        }

        self.repo.delete(&mut *tx, company_id, certificate_id).await?;

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::CertificateDeleted,
                "certificate",
                certificate.id,
                json!({ "name": certificate.name, "fileUrl": certificate.file_url }),
            )
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Certificate>, AppError> {
        self.repo.list(company_id).await
    }
}
