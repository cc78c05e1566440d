// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Evento imutável da trilha de auditoria. Toda operação de escrita do
// núcleo grava exatamente um antes de reportar sucesso.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub actor_id: Uuid,

    #[schema(example = "payment.created")]
    pub action: String,

    #[schema(example = "invoice")]
    pub target_type: String,
    pub target_id: Uuid,

    // Retrato dos valores relevantes antes/depois da mutação
    pub details: Value,

    pub created_at: DateTime<Utc>,
}

// Ações conhecidas, no formato `entidade.evento`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CompanyCreated,
    UserRoleUpdated,
    ClientCreated,
    InvoiceCreated,
    InvoiceDeleted,
    InvoiceImported,
    InvoiceImportSkipped,
    PaymentCreated,
    PaymentReversed,
    CertificateCreated,
    CertificateDeleted,
    CertificateCleanup,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CompanyCreated => "company.created",
            AuditAction::UserRoleUpdated => "user.role_updated",
            AuditAction::ClientCreated => "client.created",
            AuditAction::InvoiceCreated => "invoice.created",
            AuditAction::InvoiceDeleted => "invoice.deleted",
            AuditAction::InvoiceImported => "invoice.imported",
            AuditAction::InvoiceImportSkipped => "invoice.import_skipped",
            AuditAction::PaymentCreated => "payment.created",
            AuditAction::PaymentReversed => "payment.reversed",
            AuditAction::CertificateCreated => "certificate.created",
            AuditAction::CertificateDeleted => "certificate.deleted",
            AuditAction::CertificateCleanup => "certificate.cleanup",
        }
    }
}
