// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia cobre tudo que os serviços retornam; só falhas realmente
// inesperadas caem nas variantes internas (500).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações feitas à mão (parse de documento fiscal, itens etc.)
    #[error("Entrada inválida: {0}")]
    Validation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Identidade presente, mas sem empresa vinculada ainda
    #[error("Onboarding incompleto")]
    OnboardingIncomplete,

    #[error("Acesso negado")]
    Forbidden,

    // Também usado quando o recurso pertence a outra empresa: o sinal é o
    // mesmo para não vazar existência entre tenants.
    #[error("Recurso não encontrado")]
    NotFound,

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Código estável do erro, usado pelo catálogo i18n e pelo frontend.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::Validation(_) => "validation",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "unauthenticated",
            AppError::OnboardingIncomplete => "onboarding_incomplete",
            AppError::Forbidden => "forbidden",
            AppError::NotFound => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::OnboardingIncomplete | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Detalhes seguros para o cliente. Erros de banco/infra NUNCA expõem a
    // mensagem original: ela só vai para o log.
    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    fields.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(fields))
            }
            AppError::Validation(msg) => Some(json!({ "reason": msg })),
            AppError::Conflict(msg) => Some(json!({ "reason": msg })),
            _ => None,
        }
    }

    /// Converte para a resposta HTTP, com mensagem localizada.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        if matches!(
            self,
            AppError::DatabaseError(_)
                | AppError::InternalServerError(_)
                | AppError::BcryptError(_)
                | AppError::JwtError(_)
        ) {
            tracing::error!("Erro interno: {self:?}");
        }

        ApiError {
            status: self.status(),
            code: self.code(),
            error: store.message(&locale.0, self.code()),
            details: self.details(),
        }
    }
}

// A forma final que chega ao cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code,
            "error": self.error,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

// Fallback para handlers que devolvem AppError direto (rotas de auth) e para
// rejeições de extractors: usa o catálogo padrão em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale("en".to_string()), &I18nStore::new())
            .into_response()
    }
}
