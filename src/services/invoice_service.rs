// src/services/invoice_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, InvoiceRepository, PaymentRepository},
    models::audit::AuditAction,
    models::billing::{
        CreateInvoicePayload, Invoice, InvoiceDetail, InvoiceWithClient, NewInvoiceItem,
        StatusSnapshot,
    },
    services::audit_service::AuditService,
};

// Limites da listagem
const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct InvoiceService {
    invoice_repo: InvoiceRepository,
    client_repo: ClientRepository,
    payment_repo: PaymentRepository,
    audit: AuditService,
}

impl InvoiceService {
    pub fn new(
        invoice_repo: InvoiceRepository,
        client_repo: ClientRepository,
        payment_repo: PaymentRepository,
        audit: AuditService,
    ) -> Self {
        Self {
            invoice_repo,
            client_repo,
            payment_repo,
            audit,
        }
    }

    /// Converte e valida as linhas do payload. Linha com quantidade ou
    /// preço não positivos derruba a fatura inteira antes de tocar o banco.
    fn build_items(payload: &CreateInvoicePayload) -> Result<Vec<NewInvoiceItem>, AppError> {
        let mut items = Vec::with_capacity(payload.items.len());
        for (idx, item) in payload.items.iter().enumerate() {
            if item.quantity <= Decimal::ZERO {
                return Err(AppError::Validation(format!(
                    "Item {} com quantidade não positiva",
                    idx + 1
                )));
            }
            if item.unit_price <= Decimal::ZERO {
                return Err(AppError::Validation(format!(
                    "Item {} com preço não positivo",
                    idx + 1
                )));
            }

            let total = (item.quantity * item.unit_price).round_dp(2);
            if total <= Decimal::ZERO {
                return Err(AppError::Validation(format!(
                    "Item {} com total não positivo",
                    idx + 1
                )));
            }

            items.push(NewInvoiceItem {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total,
            });
        }

        Ok(items)
    }

    /// Cria a fatura e seus itens como uma unidade atômica, com status
    /// inicial `pending`.
    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        payload: &CreateInvoicePayload,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let items = Self::build_items(payload)?;
        let total_amount: Decimal = items.iter().map(|i| i.total).sum();

        let fiscal_key = payload
            .fiscal_document_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let issue_date = payload.issue_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = executor.begin().await?;

        // Cliente de outra empresa não existe para o chamador
        let client = self
            .client_repo
            .find_by_id(&mut *tx, company_id, payload.client_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let invoice = self
            .invoice_repo
            .insert(
                &mut *tx,
                company_id,
                client.id,
                &payload.invoice_number,
                fiscal_key,
                issue_date,
                payload.due_date,
                total_amount,
                actor_id,
            )
            .await?;

        self.invoice_repo
            .insert_items(&mut *tx, company_id, invoice.id, &items)
            .await?;

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::InvoiceCreated,
                "invoice",
                invoice.id,
                json!({
                    "invoiceNumber": invoice.invoice_number,
                    "clientId": client.id,
                    "totalAmount": invoice.total_amount,
                    "itemCount": items.len(),
                }),
            )
            .await?;

        tx.commit().await?;

        Ok(invoice)
    }

    /// Exclui a fatura em cascata estrita — pagamentos, depois itens,
    /// depois a própria linha — tudo ou nada.
    pub async fn delete_invoice<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let invoice = self
            .invoice_repo
            .lock_for_update(&mut *tx, company_id, invoice_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.payment_repo
            .delete_for_invoice(&mut *tx, company_id, invoice_id)
            .await?;
        self.invoice_repo
            .delete_items(&mut *tx, company_id, invoice_id)
            .await?;
        self.invoice_repo
            .delete(&mut *tx, company_id, invoice_id)
            .await?;

        // Auditado somente no sucesso: se qualquer passo acima falhar, a
        // transação desfaz tudo e nenhum evento é gravado.
        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::InvoiceDeleted,
                "invoice",
                invoice.id,
                json!({
                    "invoiceNumber": invoice.invoice_number,
                    "totalAmount": invoice.total_amount,
                    "status": invoice.status,
                }),
            )
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list(
        &self,
        company_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<InvoiceWithClient>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.invoice_repo.list_with_client(company_id, limit).await
    }

    /// Fatura completa: itens, razão de pagamentos e o retrato derivado.
    pub async fn detail(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<InvoiceDetail, AppError> {
        let invoice = self
            .invoice_repo
            .find_by_id(company_id, invoice_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let items = self.invoice_repo.list_items(company_id, invoice_id).await?;
        let payments = self
            .payment_repo
            .list_for_invoice(company_id, invoice_id)
            .await?;

        let paid_sum: Decimal = payments.iter().map(|p| p.amount).sum();
        let snapshot = StatusSnapshot::derive(
            invoice.total_amount,
            paid_sum,
            invoice.due_date,
            Utc::now().date_naive(),
        );

        Ok(InvoiceDetail {
            invoice,
            items,
            payments,
            snapshot,
        })
    }
}
