// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    models::auth::{Profile, Role},
};

// Guardião de papel: mutações de usuários e a superfície administrativa
// exigem admin. As demais rotas tenant-scoped exigem apenas empresa
// vinculada (tenant_guard).
pub struct RequireAdmin(pub Profile);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let profile = parts
            .extensions
            .get::<Profile>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if profile.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        Ok(RequireAdmin(profile))
    }
}
