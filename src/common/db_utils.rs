// src/common/db_utils.rs

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::tenancy::TenantContext;

// ---
// Helper RLS: a "chave" para o banco de dados
// ---
/// Adquire uma conexão da pool e define as variáveis RLS da requisição.
/// Todo handler de rota tenant-scoped passa por aqui: além do filtro
/// explícito por company_id nos repositórios, as policies do Postgres só
/// liberam linhas da empresa setada em app.company_id.
pub(crate) async fn tenant_connection(
    app_state: &AppState,
    tenant: &TenantContext,
    user: &AuthenticatedUser,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    // 1. Adquire conexão
    let mut conn = app_state.db_pool.acquire().await?;

    // 2. Define a empresa da requisição
    sqlx::query("SELECT set_config('app.company_id', $1, true)")
        .bind(tenant.0.to_string())
        .execute(&mut *conn)
        .await?;

    // 3. Define o usuário
    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user.0.id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}
