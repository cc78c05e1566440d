// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::auth::Profile,
};

async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<Profile, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return app_state.auth_service.validate_token(token).await;
        }
    }

    Err(AppError::InvalidToken)
}

/// Guarda de identidade: exige token válido e insere o perfil na
/// requisição. Suficiente para rotas que não tocam dados de tenant.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let profile = authenticate(&app_state, request.headers()).await?;
    request.extensions_mut().insert(profile);
    Ok(next.run(request).await)
}

/// Guarda de tenant: além da identidade, exige empresa vinculada. O
/// company_id do contexto vem SEMPRE do perfil autenticado — identificador
/// de tenant vindo do cliente nunca é confiável e nunca é lido daqui.
/// Perfil sem empresa recebe o sinal distinto de onboarding incompleto.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let profile = authenticate(&app_state, request.headers()).await?;

    let company_id = profile.company_id.ok_or(AppError::OnboardingIncomplete)?;

    request.extensions_mut().insert(TenantContext(company_id));
    request.extensions_mut().insert(profile);
    Ok(next.run(request).await)
}

// Extrator para obter o perfil autenticado diretamente nos handlers
#[derive(Clone)]
pub struct AuthenticatedUser(pub Profile);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Profile>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
