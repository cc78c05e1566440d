// src/handlers/imports.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{db_utils::tenant_connection, error::ApiError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::import::{FiscalDocument, ImportDocumentPayload, ImportResult},
};

// POST /api/imports/fiscal-documents
#[utoipa::path(
    post,
    path = "/api/imports/fiscal-documents",
    tag = "Imports",
    request_body = ImportDocumentPayload,
    responses(
        (status = 200, description = "Documento importado (ou duplicata relatada)", body = ImportResult),
        (status = 400, description = "Documento malformado")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_document(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    Json(payload): Json<ImportDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Parse/normalização antes de qualquer escrita
    let document = FiscalDocument::parse(payload)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = tenant_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .import_service
        .import(&mut *conn, tenant.0, user.0.id, &document)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(result)))
}
