// src/services/admin_service.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{admin_repo::SchemaColumn, AdminRepository},
    models::audit::AuditAction,
    services::{audit_service::AuditService, storage::ObjectStorage},
};

// Fachada das operações privilegiadas. O conjunto de métodos espelha a
// allow-list do AdminRepository; handlers exigem papel admin antes de
// chegar aqui.
#[derive(Clone)]
pub struct AdminService {
    repo: AdminRepository,
    audit: AuditService,
    storage: Arc<dyn ObjectStorage>,
    pool: PgPool,
}

impl AdminService {
    pub fn new(
        repo: AdminRepository,
        audit: AuditService,
        storage: Arc<dyn ObjectStorage>,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            audit,
            storage,
            pool,
        }
    }

    pub async fn inspect_schema(&self) -> Result<Vec<SchemaColumn>, AppError> {
        self.repo.list_schema().await
    }

    /// Varre certificados vencidos de todas as empresas: blob primeiro
    /// (melhor esforço), depois a linha, com um evento de auditoria na
    /// empresa dona de cada certificado removido.
    pub async fn cleanup_expired_certificates(&self, actor_id: Uuid) -> Result<u64, AppError> {
        let today = Utc::now().date_naive();
        let expired = self.repo.find_expired_certificates(today).await?;

        let mut removed = 0u64;
        for certificate in expired {
            if let Err(e) = self.storage.delete(&certificate.file_url).await {
                tracing::warn!(
                    certificate_id = %certificate.id,
                    "Falha ao remover blob na limpeza (seguindo mesmo assim): {e:?}"
                );
            }

            removed += self.repo.delete_certificate(certificate.id).await?;

            self.audit
                .record(
                    &self.pool,
                    certificate.company_id,
                    actor_id,
                    AuditAction::CertificateCleanup,
                    "certificate",
                    certificate.id,
                    json!({
                        "name": certificate.name,
                        "expiresAt": certificate.expires_at,
                    }),
                )
                .await?;
        }

        Ok(removed)
    }
}
