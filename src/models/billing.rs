// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

// --- Enums (mapeando o Postgres) ---

// Status persistido da fatura. `overdue` não entra aqui: é derivado na
// leitura a partir do vencimento (ver StatusSnapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending, // Aberta
    Partial, // Paga parcialmente
    Paid,    // Quitada
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    CreditCard,
    Cash,
    Transfer,
    Other,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Mercado São José")]
    pub name: String,

    // CPF/CNPJ normalizado (somente dígitos); único por empresa
    #[schema(example = "12345678900")]
    pub document_number: String,

    pub email: Option<String>,
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub client_id: Uuid,

    #[schema(example = "NF-000123")]
    pub invoice_number: String,

    // Presente apenas em documentos importados; chave de deduplicação
    pub fiscal_document_key: Option<String>,

    #[schema(value_type = String, format = Date, example = "2025-11-01")]
    pub issue_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-12-01")]
    pub due_date: NaiveDate,

    #[schema(example = "1000.00")]
    pub total_amount: Decimal,

    pub status: InvoiceStatus,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem: fatura + resumo do cliente embutido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWithClient {
    pub id: Uuid,
    pub client_id: Uuid,
    pub invoice_number: String,
    pub fiscal_document_key: Option<String>,

    #[schema(value_type = String, format = Date)]
    pub issue_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,

    pub total_amount: Decimal,
    pub status: InvoiceStatus,

    #[schema(example = "Mercado São José")]
    pub client_name: String,
    #[schema(example = "12345678900")]
    pub client_document: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Pão francês (kg)")]
    pub description: String,

    #[schema(example = "10.000")]
    pub quantity: Decimal,
    #[schema(example = "12.50")]
    pub unit_price: Decimal,
    #[schema(example = "125.00")]
    pub total: Decimal,
}

// Lançamento do razão de pagamentos. Append-only: nunca é atualizado;
// estornos são novas linhas negativas apontando para a original.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub invoice_id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2025-11-15")]
    pub payment_date: NaiveDate,

    pub method: PaymentMethod,
    pub notes: Option<String>,

    pub reversal_of: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

// Linha pronta para inserção: criação manual e importação convergem aqui
// antes de tocar o banco.
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

// --- Derivação de status ---

// O retrato derivado de uma fatura num instante: status persistível mais as
// sobreposições calculadas (vencida, paga a maior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: InvoiceStatus,
    pub overdue: bool,
    pub overpaid: bool,
}

impl StatusSnapshot {
    /// Função pura de derivação: `paid` quando a soma do razão cobre o
    /// total; `partial` no meio do caminho; `pending` com razão zerado (ou
    /// negativo, após estornos). `overdue` é sobreposição por data e nunca
    /// se aplica a fatura quitada. Pagamento a maior não é erro: vira flag.
    pub fn derive(
        total_amount: Decimal,
        paid_sum: Decimal,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let status = if paid_sum >= total_amount {
            InvoiceStatus::Paid
        } else if paid_sum > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Pending
        };

        Self {
            status,
            overdue: status != InvoiceStatus::Paid && due_date < today,
            overpaid: paid_sum > total_amount,
        }
    }
}

/// Normaliza um CPF/CNPJ para somente dígitos ("12.345.678/0001-90" ->
/// "12345678000190").
pub fn normalize_document(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 2, message = "required"))]
    #[schema(example = "Mercado São José")]
    pub name: String,

    #[validate(length(min = 11, max = 18, message = "invalid_document"))]
    #[schema(example = "123.456.789-00")]
    pub document_number: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Pão francês (kg)")]
    pub description: String,

    #[schema(example = "10.000")]
    pub quantity: Decimal,

    #[schema(example = "12.50")]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "NF-000123")]
    pub invoice_number: String,

    #[schema(value_type = Option<String>, format = Date)]
    pub issue_date: Option<NaiveDate>,

    #[schema(value_type = String, format = Date, example = "2025-12-01")]
    pub due_date: NaiveDate,

    // Chave opcional para faturas espelhando documento fiscal já emitido
    pub fiscal_document_key: Option<String>,

    #[validate(length(min = 1, message = "at_least_one_item"), nested)]
    pub items: Vec<InvoiceItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentPayload {
    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2025-11-15")]
    pub payment_date: NaiveDate,

    pub method: PaymentMethod,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReversePaymentPayload {
    #[validate(length(min = 3, message = "required"))]
    #[schema(example = "Pagamento duplicado pelo cliente")]
    pub reason: String,
}

// --- Respostas compostas ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
    pub payments: Vec<Payment>,
    pub snapshot: StatusSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub payment: Payment,
    pub snapshot: StatusSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn partial_then_paid() {
        let due = day(2025, 12, 1);
        let today = day(2025, 11, 10);

        let s1 = StatusSnapshot::derive(dec!(1000.00), dec!(400.00), due, today);
        assert_eq!(s1.status, InvoiceStatus::Partial);
        assert!(!s1.overdue);
        assert!(!s1.overpaid);

        let s2 = StatusSnapshot::derive(dec!(1000.00), dec!(1000.00), due, today);
        assert_eq!(s2.status, InvoiceStatus::Paid);
        assert!(!s2.overpaid);
    }

    #[test]
    fn zero_ledger_is_pending() {
        let s = StatusSnapshot::derive(
            dec!(250.00),
            Decimal::ZERO,
            day(2025, 12, 1),
            day(2025, 11, 10),
        );
        assert_eq!(s.status, InvoiceStatus::Pending);
    }

    #[test]
    fn negative_ledger_after_reversals_is_pending() {
        let s = StatusSnapshot::derive(
            dec!(250.00),
            dec!(-50.00),
            day(2025, 12, 1),
            day(2025, 11, 10),
        );
        assert_eq!(s.status, InvoiceStatus::Pending);
    }

    #[test]
    fn partial_past_due_gets_overdue_overlay() {
        let s = StatusSnapshot::derive(
            dec!(1000.00),
            dec!(400.00),
            day(2025, 10, 1),
            day(2025, 11, 10),
        );
        assert_eq!(s.status, InvoiceStatus::Partial);
        assert!(s.overdue);
    }

    #[test]
    fn paid_invoice_is_never_overdue() {
        let s = StatusSnapshot::derive(
            dec!(1000.00),
            dec!(1000.00),
            day(2025, 10, 1),
            day(2025, 11, 10),
        );
        assert_eq!(s.status, InvoiceStatus::Paid);
        assert!(!s.overdue);
    }

    #[test]
    fn overpayment_is_paid_and_flagged() {
        let s = StatusSnapshot::derive(
            dec!(1000.00),
            dec!(1200.00),
            day(2025, 12, 1),
            day(2025, 11, 10),
        );
        assert_eq!(s.status, InvoiceStatus::Paid);
        assert!(s.overpaid);
        assert!(!s.overdue);
    }

    #[test]
    fn due_today_is_not_overdue() {
        let today = day(2025, 11, 10);
        let s = StatusSnapshot::derive(dec!(100.00), Decimal::ZERO, today, today);
        assert!(!s.overdue);
    }

    #[test]
    fn normalize_document_strips_punctuation() {
        assert_eq!(normalize_document("12.345.678/0001-90"), "12345678000190");
        assert_eq!(normalize_document("123.456.789-00"), "12345678900");
        assert_eq!(normalize_document("12345678900"), "12345678900");
    }

    #[test]
    fn invoice_payload_without_items_fails_validation() {
        let payload = CreateInvoicePayload {
            client_id: Uuid::new_v4(),
            invoice_number: "NF-000123".to_string(),
            issue_date: None,
            due_date: day(2025, 12, 1),
            fiscal_document_key: None,
            items: vec![],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn invoice_payload_with_blank_item_description_fails_validation() {
        let payload = CreateInvoicePayload {
            client_id: Uuid::new_v4(),
            invoice_number: "NF-000123".to_string(),
            issue_date: None,
            due_date: day(2025, 12, 1),
            fiscal_document_key: None,
            items: vec![InvoiceItemPayload {
                description: String::new(),
                quantity: dec!(1),
                unit_price: dec!(10.00),
            }],
        };
        assert!(payload.validate().is_err());
    }
}
