// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::tenant_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireAdmin, tenancy::TenantContext},
    models::auth::{Profile, UpdateRolePayload},
};

// GET /api/users — membros da empresa do chamador
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Membros da empresa", body = Vec<Profile>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let members = app_state
        .company_service
        .list_members(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(members))
}

// PATCH /api/users/{id}/role — mutação de usuário: só admin
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    tag = "Users",
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Papel atualizado", body = Profile),
        (status = 403, description = "Requer papel admin"),
        (status = 404, description = "Membro não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do perfil")),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    admin: RequireAdmin,
    Path(profile_id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<Profile>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let actor = AuthenticatedUser(admin.0.clone());
    let mut conn = tenant_connection(&app_state, &tenant, &actor)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .company_service
        .update_member_role(&mut *conn, tenant.0, admin.0.id, profile_id, payload.role)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(updated))
}
