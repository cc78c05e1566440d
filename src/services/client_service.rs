// src/services/client_service.rs

use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::audit::AuditAction,
    models::billing::{normalize_document, Client, CreateClientPayload},
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    audit: AuditService,
}

impl ClientService {
    pub fn new(repo: ClientRepository, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    /// Criação explícita: documento repetido na mesma empresa é Conflict
    /// (diferente da importação, onde cliente existente é reaproveitado).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        payload: &CreateClientPayload,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let document_number = normalize_document(&payload.document_number);
        if document_number.len() != 11 && document_number.len() != 14 {
            return Err(AppError::Validation(
                "CPF/CNPJ do cliente inválido".to_string(),
            ));
        }

        let mut tx = executor.begin().await?;

        let client = self
            .repo
            .create(
                &mut *tx,
                company_id,
                &payload.name,
                &document_number,
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )
            .await?;

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::ClientCreated,
                "client",
                client.id,
                json!({ "name": client.name, "documentNumber": client.document_number }),
            )
            .await?;

        tx.commit().await?;

        Ok(client)
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Client>, AppError> {
        self.repo.list(company_id).await
    }
}
