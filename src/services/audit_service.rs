// src/services/audit_service.rs

use serde_json::Value;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::AuditRepository, models::audit::AuditAction};

// O gravador de auditoria. Roda no executor do chamador: quando a mutação
// acontece dentro de uma transação, o evento entra na mesma transação e a
// operação só reporta sucesso com a trilha garantida.
#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    pub async fn record<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        action: AuditAction,
        target_type: &str,
        target_id: Uuid,
        details: Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .insert(
                executor,
                company_id,
                actor_id,
                action.as_str(),
                target_type,
                target_id,
                &details,
            )
            .await
    }

    pub async fn list_recent(
        &self,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<crate::models::audit::AuditLogEntry>, AppError> {
        self.repo.list_recent(company_id, limit).await
    }
}
