// src/handlers/admin.rs

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::admin_repo::SchemaColumn,
    middleware::{i18n::Locale, rbac::RequireAdmin},
};

// A superfície administrativa inteira: estes dois handlers são os únicos
// consumidores do AdminService/AdminRepository.

// GET /api/admin/schema
#[utoipa::path(
    get,
    path = "/api/admin/schema",
    tag = "Admin",
    responses(
        (status = 200, description = "Colunas do schema público", body = Vec<SchemaColumn>),
        (status = 403, description = "Requer papel admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn inspect_schema(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireAdmin,
) -> Result<Json<Vec<SchemaColumn>>, ApiError> {
    let columns = app_state
        .admin_service
        .inspect_schema()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(columns))
}

// POST /api/admin/certificates/cleanup
#[utoipa::path(
    post,
    path = "/api/admin/certificates/cleanup",
    tag = "Admin",
    responses(
        (status = 200, description = "Certificados vencidos removidos (todas as empresas)"),
        (status = 403, description = "Requer papel admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn cleanup_certificates(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireAdmin,
) -> Result<Json<Value>, ApiError> {
    let removed = app_state
        .admin_service
        .cleanup_expired_certificates(admin.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "removed": removed })))
}
