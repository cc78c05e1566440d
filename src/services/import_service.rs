// src/services/import_service.rs

use serde_json::json;
use sqlx::{Acquire, PgConnection};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, InvoiceRepository},
    models::audit::AuditAction,
    models::billing::Client,
    models::import::{FiscalDocument, ImportOutcome, ImportResult},
    services::audit_service::AuditService,
};

// O motor de importação. Contrato de idempotência: reenviar o mesmo
// documento, quantas vezes for, produz exatamente uma fatura — a chave é
// (company_id, fiscal_key). Documento repetido não é erro: é no-op
// relatado como `duplicate`, com o evento de auditoria registrando a
// tentativa.
#[derive(Clone)]
pub struct ImportService {
    client_repo: ClientRepository,
    invoice_repo: InvoiceRepository,
    audit: AuditService,
}

impl ImportService {
    pub fn new(
        client_repo: ClientRepository,
        invoice_repo: InvoiceRepository,
        audit: AuditService,
    ) -> Self {
        Self {
            client_repo,
            invoice_repo,
            audit,
        }
    }

    /// Importa um documento já validado. Recebe a conexão direto porque um
    /// conflito de chave única no meio da transação (corrida entre duas
    /// importações do mesmo documento) aborta a transação inteira: a
    /// segunda tentativa precisa recomeçar do zero na mesma conexão — e aí
    /// encontra as linhas da vencedora e cai no caminho de duplicata.
    pub async fn import(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        actor_id: Uuid,
        document: &FiscalDocument,
    ) -> Result<ImportResult, AppError> {
        for attempt in 0..2 {
            let mut tx = (&mut *conn).begin().await?;

            match self
                .try_import(&mut tx, company_id, actor_id, document)
                .await
            {
                Ok(result) => {
                    tx.commit().await?;
                    return Ok(result);
                }
                Err(AppError::Conflict(_)) if attempt == 0 => {
                    tx.rollback().await?;
                    tracing::debug!(
                        fiscal_key = %document.fiscal_key,
                        "corrida de importação detectada, repetindo"
                    );
                }
                Err(e) => {
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }

        // Duas corridas seguidas na mesma chave não têm explicação benigna
        Err(AppError::Conflict(
            "Documento fiscal em conflito de importação".to_string(),
        ))
    }

    async fn try_import(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: Uuid,
        actor_id: Uuid,
        document: &FiscalDocument,
    ) -> Result<ImportResult, AppError> {
        let client = self
            .resolve_client(&mut *tx, company_id, document)
            .await?;

        // Chave já registrada: devolve a identidade existente, sem escrita
        // além do evento de auditoria
        if let Some(existing) = self
            .invoice_repo
            .find_by_fiscal_key(&mut **tx, company_id, &document.fiscal_key)
            .await?
        {
            self.audit
                .record(
                    &mut **tx,
                    company_id,
                    actor_id,
                    AuditAction::InvoiceImportSkipped,
                    "invoice",
                    existing.id,
                    json!({
                        "fiscalKey": document.fiscal_key,
                        "invoiceNumber": existing.invoice_number,
                    }),
                )
                .await?;

            return Ok(ImportResult {
                invoice_id: existing.id,
                outcome: ImportOutcome::Duplicate,
            });
        }

        let invoice = self
            .invoice_repo
            .insert(
                &mut **tx,
                company_id,
                client.id,
                &document.invoice_number,
                Some(&document.fiscal_key),
                document.issue_date,
                document.due_date,
                document.total_amount,
                actor_id,
            )
            .await?;

        self.invoice_repo
            .insert_items(&mut **tx, company_id, invoice.id, &document.items)
            .await?;

        self.audit
            .record(
                &mut **tx,
                company_id,
                actor_id,
                AuditAction::InvoiceImported,
                "invoice",
                invoice.id,
                json!({
                    "fiscalKey": document.fiscal_key,
                    "invoiceNumber": invoice.invoice_number,
                    "clientId": client.id,
                    "totalAmount": invoice.total_amount,
                    "itemCount": document.items.len(),
                }),
            )
            .await?;

        Ok(ImportResult {
            invoice_id: invoice.id,
            outcome: ImportOutcome::Imported,
        })
    }

    // A identidade do cliente nasce do documento e nunca é sobrescrita por
    // importações seguintes; apenas contato em branco é preenchido.
    async fn resolve_client(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: Uuid,
        document: &FiscalDocument,
    ) -> Result<Client, AppError> {
        if let Some(existing) = self
            .client_repo
            .find_by_document(&mut **tx, company_id, &document.client_tax_id)
            .await?
        {
            if existing.email.is_none() && document.client_email.is_some() {
                self.client_repo
                    .fill_blank_contact(
                        &mut **tx,
                        company_id,
                        existing.id,
                        document.client_email.as_deref(),
                    )
                    .await?;
            }
            return Ok(existing);
        }

        self.client_repo
            .create(
                &mut **tx,
                company_id,
                &document.client_name,
                &document.client_tax_id,
                document.client_email.as_deref(),
                None,
            )
            .await
    }
}
