// src/handlers/payments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
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
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::billing::{PaymentResult, RegisterPaymentPayload, ReversePaymentPayload},
};

// POST /api/invoices/{id}/payments
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/payments",
    tag = "Payments",
    request_body = RegisterPaymentPayload,
    responses(
        (status = 201, description = "Lançamento registrado; status recalculado", body = PaymentResult),
        (status = 400, description = "Valor não positivo"),
        (status = 404, description = "Fatura não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da fatura")),
    security(("api_jwt" = []))
)]
pub async fn register_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<RegisterPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = tenant_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .payment_service
        .register_payment(&mut *conn, tenant.0, user.0.id, invoice_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}

// POST /api/payments/{id}/reverse
#[utoipa::path(
    post,
    path = "/api/payments/{id}/reverse",
    tag = "Payments",
    request_body = ReversePaymentPayload,
    responses(
        (status = 201, description = "Estorno lançado; status recalculado", body = PaymentResult),
        (status = 404, description = "Pagamento não encontrado"),
        (status = 409, description = "Pagamento já estornado")
    ),
    params(("id" = Uuid, Path, description = "ID do pagamento original")),
    security(("api_jwt" = []))
)]
pub async fn reverse_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    user: AuthenticatedUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<ReversePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = tenant_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .payment_service
        .reverse_payment(&mut *conn, tenant.0, user.0.id, payment_id, &payload.reason)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}
