// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::audit::AuditLogEntry,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditQuery {
    /// Máximo de eventos retornados (padrão 100)
    pub limit: Option<i64>,
}

// GET /api/audit — leitura da trilha para os relatórios
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Audit",
    params(ListAuditQuery),
    responses(
        (status = 200, description = "Eventos recentes da empresa", body = Vec<AuditLogEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_audit(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ListAuditQuery>,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);

    let entries = app_state
        .audit_service
        .list_recent(tenant.0, limit)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entries))
}
