// src/services/company_service.rs

use serde_json::json;
use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, UserRepository},
    models::audit::AuditAction,
    models::auth::{Profile, Role},
    models::billing::normalize_document,
    models::company::{Company, CreateCompanyPayload},
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    user_repo: UserRepository,
    audit: AuditService,
    pool: PgPool, // o onboarding roda antes de existir contexto de tenant
}

impl CompanyService {
    pub fn new(
        company_repo: CompanyRepository,
        user_repo: UserRepository,
        audit: AuditService,
        pool: PgPool,
    ) -> Self {
        Self {
            company_repo,
            user_repo,
            audit,
            pool,
        }
    }

    /// Cria a empresa e, atomicamente, vincula quem a criou como admin.
    /// É o fim do onboarding: a partir daqui o perfil acessa rotas
    /// tenant-scoped.
    pub async fn create_with_admin(
        &self,
        profile: &Profile,
        payload: &CreateCompanyPayload,
    ) -> Result<Company, AppError> {
        if profile.company_id.is_some() {
            return Err(AppError::Conflict(
                "Perfil já vinculado a uma empresa".to_string(),
            ));
        }

        let tax_id = normalize_document(&payload.tax_id);
        if tax_id.len() != 11 && tax_id.len() != 14 {
            return Err(AppError::Validation(
                "CPF/CNPJ da empresa inválido".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .create(
                &mut *tx,
                &payload.legal_name,
                &tax_id,
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )
            .await?;

        self.user_repo
            .attach_company(&mut *tx, profile.id, company.id)
            .await?;

        self.audit
            .record(
                &mut *tx,
                company.id,
                profile.id,
                AuditAction::CompanyCreated,
                "company",
                company.id,
                json!({ "legalName": company.legal_name, "taxId": company.tax_id }),
            )
            .await?;

        tx.commit().await?;

        Ok(company)
    }

    pub async fn find(&self, company_id: Uuid) -> Result<Option<Company>, AppError> {
        self.company_repo.find_by_id(company_id).await
    }

    pub async fn list_members(&self, company_id: Uuid) -> Result<Vec<Profile>, AppError> {
        self.user_repo.list_by_company(company_id).await
    }

    /// Mutação de usuário: exige papel admin (garantido no handler) e só
    /// alcança membros da própria empresa.
    pub async fn update_member_role<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        profile_id: Uuid,
        role: Role,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let updated = self
            .user_repo
            .update_role(&mut *tx, company_id, profile_id, role)
            .await?;

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::UserRoleUpdated,
                "profile",
                updated.id,
                json!({ "role": updated.role }),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}
