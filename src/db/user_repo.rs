// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::user::{User, UserStatus, UserSummary},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_email(&self, correo: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE correo = $1")
            .bind(correo)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_document(&self, nro_documento: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE nro_documento = $1")
            .bind(nro_documento)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn summary_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<UserSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summary = sqlx::query_as::<_, UserSummary>(
            "SELECT id, nombres, apellidos, correo FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(summary)
    }

    // Cria um novo usuário, com tratamento de erro específico para
    // correo/documento duplicados (constraints UNIQUE do schema).
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        nombres: &str,
        apellidos: &str,
        correo: &str,
        contrasena_hash: &str,
        nro_documento: Option<&str>,
        telefono: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (nombres, apellidos, correo, contrasena, nro_documento, telefono)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(nombres)
        .bind(apellidos)
        .bind(correo)
        .bind(contrasena_hash)
        .bind(nro_documento)
        .bind(telefono)
        .fetch_one(executor)
        .await
        .map_err(|e| Self::map_unique_violation(e))
    }

    /// Atualização parcial do perfil: campos None ficam como estão.
    /// tipo e estado nunca passam por aqui.
    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nombres: Option<&str>,
        apellidos: Option<&str>,
        telefono: Option<&str>,
        nro_documento: Option<&str>,
        contrasena_hash: Option<&str>,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET nombres = COALESCE($2, nombres),
                apellidos = COALESCE($3, apellidos),
                telefono = COALESCE($4, telefono),
                nro_documento = COALESCE($5, nro_documento),
                contrasena = COALESCE($6, contrasena),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombres)
        .bind(apellidos)
        .bind(telefono)
        .bind(nro_documento)
        .bind(contrasena_hash)
        .fetch_optional(executor)
        .await
        .map_err(|e| Self::map_unique_violation(e))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        estado: UserStatus,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(estado)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    fn map_unique_violation(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                if constraint.contains("correo") {
                    return AppError::Conflict("El correo electrónico ya está registrado".into());
                }
                if constraint.contains("nro_documento") {
                    return AppError::Conflict("El número de documento ya está registrado".into());
                }
            }
        }
        e.into()
    }
}
