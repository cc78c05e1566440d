// src/models/certificate.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Certificado de conformidade da empresa. O arquivo em si mora no object
// storage; a linha só guarda a URL.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Certificado digital A1 2025")]
    pub name: String,

    #[schema(example = "storage://certificates/550e8400.pfx")]
    pub file_url: String,

    #[schema(value_type = Option<String>, format = Date, example = "2026-06-30")]
    pub expires_at: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}
