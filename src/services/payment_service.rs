// src/services/payment_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, InvoiceRepository, PaymentRepository},
    models::audit::AuditAction,
    models::billing::{PaymentResult, RegisterPaymentPayload, StatusSnapshot},
    services::{audit_service::AuditService, notifier::Notifier},
};

// O motor do razão: insere o lançamento e recalcula o status da fatura na
// mesma transação, com a linha da fatura travada (FOR UPDATE). Dois
// pagamentos concorrentes na mesma fatura são serializados pelo lock e
// nunca enxergam uma soma defasada.
#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    invoice_repo: InvoiceRepository,
    company_repo: CompanyRepository,
    audit: AuditService,
    notifier: Arc<dyn Notifier>,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        invoice_repo: InvoiceRepository,
        company_repo: CompanyRepository,
        audit: AuditService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            payment_repo,
            invoice_repo,
            company_repo,
            audit,
            notifier,
        }
    }

    pub async fn register_payment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        invoice_id: Uuid,
        payload: &RegisterPaymentPayload,
    ) -> Result<PaymentResult, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if payload.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Valor do pagamento deve ser positivo".to_string(),
            ));
        }

        let mut tx = executor.begin().await?;

        // Trava a fatura; ausente (ou de outra empresa) é NotFound
        let invoice = self
            .invoice_repo
            .lock_for_update(&mut *tx, company_id, invoice_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let payment = self
            .payment_repo
            .insert(
                &mut *tx,
                company_id,
                invoice_id,
                payload.amount,
                payload.payment_date,
                payload.method,
                payload.notes.as_deref(),
                None,
            )
            .await?;

        // Agregado lido sob o mesmo lock
        let paid_sum = self
            .payment_repo
            .paid_sum(&mut *tx, company_id, invoice_id)
            .await?;

        let snapshot = StatusSnapshot::derive(
            invoice.total_amount,
            paid_sum,
            invoice.due_date,
            Utc::now().date_naive(),
        );

        if snapshot.status != invoice.status {
            self.invoice_repo
                .update_status(&mut *tx, company_id, invoice_id, snapshot.status)
                .await?;
        }

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::PaymentCreated,
                "invoice",
                invoice_id,
                json!({
                    "paymentId": payment.id,
                    "amount": payment.amount,
                    "method": payment.method,
                    "paidSum": paid_sum,
                    "statusBefore": invoice.status,
                    "statusAfter": snapshot.status,
                    "overpaid": snapshot.overpaid,
                }),
            )
            .await?;

        tx.commit().await?;

        if snapshot.overpaid {
            self.flag_overpayment(company_id, invoice_id, invoice.total_amount, paid_sum)
                .await;
        }

        Ok(PaymentResult { payment, snapshot })
    }

    /// Estorno explícito: um lançamento negativo apontando para o
    /// pagamento original. É a única forma de uma fatura quitada voltar a
    /// `partial`/`pending`.
    pub async fn reverse_payment<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        actor_id: Uuid,
        payment_id: Uuid,
        reason: &str,
    ) -> Result<PaymentResult, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let original = self
            .payment_repo
            .find_by_id(&mut *tx, company_id, payment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if original.reversal_of.is_some() {
            return Err(AppError::Validation(
                "Não é possível estornar um estorno".to_string(),
            ));
        }

        // Mesma ordem de lock do registro de pagamento
        let invoice = self
            .invoice_repo
            .lock_for_update(&mut *tx, company_id, original.invoice_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self
            .payment_repo
            .has_reversal(&mut *tx, company_id, payment_id)
            .await?
        {
            return Err(AppError::Conflict("Pagamento já estornado".to_string()));
        }

        let reversal = self
            .payment_repo
            .insert(
                &mut *tx,
                company_id,
                original.invoice_id,
                -original.amount,
                Utc::now().date_naive(),
                original.method,
                Some(reason),
                Some(original.id),
            )
            .await?;

        let paid_sum = self
            .payment_repo
            .paid_sum(&mut *tx, company_id, original.invoice_id)
            .await?;

        let snapshot = StatusSnapshot::derive(
            invoice.total_amount,
            paid_sum,
            invoice.due_date,
            Utc::now().date_naive(),
        );

        if snapshot.status != invoice.status {
            self.invoice_repo
                .update_status(&mut *tx, company_id, original.invoice_id, snapshot.status)
                .await?;
        }

        self.audit
            .record(
                &mut *tx,
                company_id,
                actor_id,
                AuditAction::PaymentReversed,
                "invoice",
                original.invoice_id,
                json!({
                    "paymentId": original.id,
                    "reversalId": reversal.id,
                    "amount": reversal.amount,
                    "reason": reason,
                    "paidSum": paid_sum,
                    "statusAfter": snapshot.status,
                }),
            )
            .await?;

        tx.commit().await?;

        Ok(PaymentResult {
            payment: reversal,
            snapshot,
        })
    }

    // Pagamento a maior é condição de qualidade de dado, não erro: loga,
    // avisa o contato da empresa e segue. Falha do aviso só vira log.
    async fn flag_overpayment(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
        total_amount: Decimal,
        paid_sum: Decimal,
    ) {
        tracing::warn!(
            %invoice_id,
            %total_amount,
            %paid_sum,
            "fatura paga a maior"
        );

        let contact = match self.company_repo.find_by_id(company_id).await {
            Ok(Some(company)) => company.email,
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Falha ao buscar contato da empresa: {e:?}");
                None
            }
        };

        if let Some(to) = contact {
            let subject = "Fatura recebida a maior".to_string();
            let body = format!(
                "A fatura {} recebeu {} sobre um total de {}. Verifique se há necessidade de estorno.",
                invoice_id, paid_sum, total_amount
            );
            if let Err(e) = self.notifier.send(&to, &subject, &body).await {
                tracing::warn!("Falha ao notificar pagamento a maior: {e:?}");
            }
        }
    }
}
