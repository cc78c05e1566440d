// src/handlers/certificates.rs

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::tenant_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::certificate::Certificate,
};

// Campos esperados no multipart: `name` (texto), `expiresAt` (texto
// opcional, YYYY-MM-DD) e `file` (o arquivo).
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(String, Option<NaiveDate>, String, Vec<u8>), AppError> {
    let mut name: Option<String> = None;
    let mut expires_at: Option<NaiveDate> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart inválido: {}", e)))?
    {
        // `text()`/`bytes()` consomem o field; o nome precisa ser copiado antes
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::Validation("Campo 'name' ilegível".to_string()))?,
                );
            }
            Some("expiresAt") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Campo 'expiresAt' ilegível".to_string()))?;
                if !raw.trim().is_empty() {
                    let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                        .map_err(|_| {
                            AppError::Validation(format!("Data inválida em 'expiresAt': '{}'", raw))
                        })?;
                    expires_at = Some(parsed);
                }
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("certificado.bin")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Arquivo ilegível".to_string()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Campo 'name' é obrigatório".to_string()))?;
    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Campo 'file' é obrigatório".to_string()))?;

    Ok((name, expires_at, file_name, bytes))
}

// POST /api/certificates
#[utoipa::path(
    post,
    path = "/api/certificates",
    tag = "Certificates",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Certificado armazenado", body = Certificate),
        (status = 400, description = "Upload malformado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_certificate(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (name, expires_at, file_name, bytes) = read_upload(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = tenant_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let certificate = app_state
        .certificate_service
        .upload(
            &mut *conn,
            tenant.0,
            user.0.id,
            &name,
            &file_name,
            &bytes,
            expires_at,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(certificate)))
}

// GET /api/certificates
#[utoipa::path(
    get,
    path = "/api/certificates",
    tag = "Certificates",
    responses(
        (status = 200, description = "Certificados da empresa", body = Vec<Certificate>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_certificates(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<Json<Vec<Certificate>>, ApiError> {
    let certificates = app_state
        .certificate_service
        .list(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(certificates))
}

// DELETE /api/certificates/{id}
#[utoipa::path(
    delete,
    path = "/api/certificates/{id}",
    tag = "Certificates",
    responses(
        (status = 200, description = "Blob e linha removidos"),
        (status = 404, description = "Certificado não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do certificado")),
    security(("api_jwt" = []))
)]
pub async fn delete_certificate(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    Path(certificate_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = tenant_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .certificate_service
        .delete(&mut *conn, tenant.0, user.0.id, certificate_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true })))
}
