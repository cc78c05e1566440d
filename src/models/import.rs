// src/models/import.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;

use crate::common::error::AppError;
use crate::models::billing::{normalize_document, NewInvoiceItem};

// Corpo bruto enviado pelo integrador. Valores monetários chegam como
// string (o documento é gerado fora do sistema) e só viram Decimal depois
// do parse — valor ilegível é erro de validação, nunca panic.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocumentPayload {
    #[schema(example = "35251112345678000190550010000001231000001234")]
    pub fiscal_key: String,

    // Quando ausente, usamos a própria chave fiscal como número
    #[schema(example = "NF-000123")]
    pub invoice_number: Option<String>,

    #[schema(example = "2025-11-01")]
    pub issue_date: String,

    // Opcional: documento sem vencimento explícito vence na emissão
    #[schema(example = "2025-12-01")]
    pub due_date: Option<String>,

    #[schema(example = "250.00")]
    pub total_amount: String,

    #[schema(example = "123.456.789-00")]
    pub client_tax_id: String,

    #[schema(example = "Mercado São José")]
    pub client_name: String,

    pub client_email: Option<String>,

    #[serde(default)]
    pub items: Vec<ImportItemPayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportItemPayload {
    pub description: String,
    #[schema(example = "10.000")]
    pub quantity: String,
    #[schema(example = "12.50")]
    pub unit_price: String,
    #[schema(example = "125.00")]
    pub total: String,
}

// Documento fiscal já validado e normalizado, pronto para o motor de
// importação.
#[derive(Debug, Clone)]
pub struct FiscalDocument {
    pub fiscal_key: String,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub client_tax_id: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub items: Vec<NewInvoiceItem>,
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal, AppError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::Validation(format!("Valor ilegível em '{}': '{}'", field, raw)))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Data inválida em '{}': '{}'", field, raw)))
}

impl FiscalDocument {
    /// Valida e normaliza o corpo bruto. Nenhuma escrita acontece antes
    /// daqui: documento malformado é rejeitado inteiro.
    pub fn parse(payload: ImportDocumentPayload) -> Result<Self, AppError> {
        let fiscal_key = payload.fiscal_key.trim().to_string();
        if fiscal_key.is_empty() {
            return Err(AppError::Validation(
                "Documento sem chave fiscal".to_string(),
            ));
        }

        let total_amount = parse_amount("totalAmount", &payload.total_amount)?;
        if total_amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Valor total do documento deve ser positivo".to_string(),
            ));
        }

        let issue_date = parse_date("issueDate", &payload.issue_date)?;
        let due_date = match payload.due_date.as_deref() {
            Some(raw) => parse_date("dueDate", raw)?,
            None => issue_date,
        };

        let client_tax_id = normalize_document(&payload.client_tax_id);
        if client_tax_id.is_empty() {
            return Err(AppError::Validation(
                "Documento sem CPF/CNPJ do cliente".to_string(),
            ));
        }

        let client_name = payload.client_name.trim().to_string();
        if client_name.is_empty() {
            return Err(AppError::Validation(
                "Documento sem nome do cliente".to_string(),
            ));
        }

        let invoice_number = payload
            .invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&fiscal_key)
            .to_string();

        let items = if payload.items.is_empty() {
            // Documento sem itens discriminados vira uma linha única
            vec![NewInvoiceItem {
                description: format!("Documento fiscal {}", invoice_number),
                quantity: Decimal::ONE,
                unit_price: total_amount,
                total: total_amount,
            }]
        } else {
            let mut parsed = Vec::with_capacity(payload.items.len());
            let mut sum = Decimal::ZERO;
            for (idx, item) in payload.items.iter().enumerate() {
                let description = item.description.trim().to_string();
                if description.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Item {} sem descrição",
                        idx + 1
                    )));
                }
                let total = parse_amount("items.total", &item.total)?;
                if total <= Decimal::ZERO {
                    return Err(AppError::Validation(format!(
                        "Item {} com total não positivo",
                        idx + 1
                    )));
                }
                sum += total;
                parsed.push(NewInvoiceItem {
                    description,
                    quantity: parse_amount("items.quantity", &item.quantity)?,
                    unit_price: parse_amount("items.unitPrice", &item.unit_price)?,
                    total,
                });
            }

            // Um documento fiscal é consistente por construção; soma que não
            // bate com o total indica defeito de parsing no emissor.
            if sum != total_amount {
                return Err(AppError::Validation(format!(
                    "Itens somam {} mas o total do documento é {}",
                    sum, total_amount
                )));
            }
            parsed
        };

        Ok(Self {
            fiscal_key,
            invoice_number,
            issue_date,
            due_date,
            total_amount,
            client_tax_id,
            client_name,
            client_email: payload.client_email,
            items,
        })
    }
}

// Desfecho da importação: documento repetido não é erro, é no-op relatado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported,
    Duplicate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub invoice_id: Uuid,
    pub outcome: ImportOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_payload() -> ImportDocumentPayload {
        ImportDocumentPayload {
            fiscal_key: "X1".to_string(),
            invoice_number: Some("NF-1".to_string()),
            issue_date: "2025-11-01".to_string(),
            due_date: Some("2025-12-01".to_string()),
            total_amount: "250.00".to_string(),
            client_tax_id: "123.456.789-00".to_string(),
            client_name: "Mercado São José".to_string(),
            client_email: None,
            items: vec![],
        }
    }

    #[test]
    fn parses_and_normalizes() {
        let doc = FiscalDocument::parse(base_payload()).unwrap();
        assert_eq!(doc.fiscal_key, "X1");
        assert_eq!(doc.total_amount, dec!(250.00));
        assert_eq!(doc.client_tax_id, "12345678900");
        assert_eq!(doc.due_date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    }

    #[test]
    fn missing_fiscal_key_is_rejected() {
        let mut payload = base_payload();
        payload.fiscal_key = "   ".to_string();
        assert!(matches!(
            FiscalDocument::parse(payload),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn unparseable_amount_is_rejected() {
        let mut payload = base_payload();
        payload.total_amount = "R$ duzentos".to_string();
        assert!(matches!(
            FiscalDocument::parse(payload),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn missing_due_date_falls_back_to_issue_date() {
        let mut payload = base_payload();
        payload.due_date = None;
        let doc = FiscalDocument::parse(payload).unwrap();
        assert_eq!(doc.due_date, doc.issue_date);
    }

    #[test]
    fn document_without_items_gets_a_synthetic_line() {
        let doc = FiscalDocument::parse(base_payload()).unwrap();
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].total, dec!(250.00));
        assert_eq!(doc.items[0].quantity, Decimal::ONE);
    }

    #[test]
    fn item_sum_must_match_document_total() {
        let mut payload = base_payload();
        payload.items = vec![
            ImportItemPayload {
                description: "A".to_string(),
                quantity: "1".to_string(),
                unit_price: "100.00".to_string(),
                total: "100.00".to_string(),
            },
            ImportItemPayload {
                description: "B".to_string(),
                quantity: "1".to_string(),
                unit_price: "100.00".to_string(),
                total: "100.00".to_string(),
            },
        ];
        assert!(matches!(
            FiscalDocument::parse(payload),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn matching_item_sum_is_accepted() {
        let mut payload = base_payload();
        payload.items = vec![
            ImportItemPayload {
                description: "A".to_string(),
                quantity: "1".to_string(),
                unit_price: "150.00".to_string(),
                total: "150.00".to_string(),
            },
            ImportItemPayload {
                description: "B".to_string(),
                quantity: "2".to_string(),
                unit_price: "50.00".to_string(),
                total: "100.00".to_string(),
            },
        ];
        let doc = FiscalDocument::parse(payload).unwrap();
        assert_eq!(doc.items.len(), 2);
    }
}
