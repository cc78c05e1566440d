// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Profile, Role},
};

// O repositório de perfis, responsável por todas as interações com a
// tabela 'profiles'. Consultas de identidade rodam fora do contexto de
// tenant (o login acontece antes de existir empresa).
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um perfil pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    // Busca um perfil pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    // Cria um novo perfil (ainda sem empresa vinculada)
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Este e-mail já está em uso".to_string());
                }
            }
            e.into()
        })
    }

    /// Vincula o perfil à empresa recém-criada, já como admin. Só faz
    /// sentido dentro da transação de onboarding.
    pub async fn attach_company<'e, E>(
        &self,
        executor: E,
        profile_id: Uuid,
        company_id: Uuid,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET company_id = $2, role = 'admin', updated_at = NOW()
            WHERE id = $1 AND company_id IS NULL
            RETURNING *
            "#,
        )
        .bind(profile_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;

        // company_id já preenchido: o filtro do UPDATE não casa
        profile.ok_or_else(|| AppError::Conflict("Perfil já vinculado a uma empresa".to_string()))
    }

    // Membros da empresa do chamador
    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Profile>, AppError> {
        let members = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE company_id = $1 ORDER BY full_name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Altera o papel de um membro DA MESMA empresa. Perfil de outra
    /// empresa não casa com o filtro e o resultado é NotFound.
    pub async fn update_role<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        profile_id: Uuid,
        role: Role,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET role = $3, updated_at = NOW()
            WHERE id = $2 AND company_id = $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(profile_id)
        .bind(role)
        .fetch_optional(executor)
        .await?;

        profile.ok_or(AppError::NotFound)
    }
}
