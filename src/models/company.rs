// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

// A empresa é a raiz do isolamento: todo dado financeiro pertence a uma.
// Nunca é apagada por este núcleo.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,

    #[schema(example = "Padaria Dois Irmãos LTDA")]
    pub legal_name: String,

    // CNPJ normalizado (somente dígitos)
    #[schema(example = "12345678000190")]
    pub tax_id: String,

    pub email: Option<String>,
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Payload do onboarding: cria a empresa e vincula o criador como admin.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 2, message = "required"))]
    #[schema(example = "Padaria Dois Irmãos LTDA")]
    pub legal_name: String,

    #[validate(length(min = 11, max = 18, message = "invalid_tax_id"))]
    #[schema(example = "12.345.678/0001-90")]
    pub tax_id: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}
