// src/services/user_service.rs

use bcrypt::{hash, verify};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::user::{User, UserStatus},
};

pub struct RegisterData {
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
    pub contrasena: String,
    pub nro_documento: Option<String>,
    pub telefono: Option<String>,
}

pub struct UpdateProfileData {
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    pub telefono: Option<String>,
    pub nro_documento: Option<String>,
    pub contrasena: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(user_repo: UserRepository, pool: PgPool) -> Self {
        Self { user_repo, pool }
    }

    /// Registra um usuário novo. A senha NUNCA é guardada em claro: bcrypt
    /// com custo padrão, fora do executor async para não travar o runtime.
    pub async fn register(&self, data: RegisterData) -> Result<User, AppError> {
        let contrasena = data.contrasena;
        let hashed = tokio::task::spawn_blocking(move || hash(&contrasena, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Duplicidade de correo/documento vira Conflict no repositório.
        let user = self
            .user_repo
            .insert(
                &self.pool,
                &data.nombres,
                &data.apellidos,
                &data.correo,
                &hashed,
                data.nro_documento.as_deref(),
                data.telefono.as_deref(),
            )
            .await?;

        tracing::info!("✅ Usuário registrado: {}", user.correo);
        Ok(user)
    }

    /// Valida as credenciais. Usuário desconhecido e senha errada devolvem o
    /// mesmo erro genérico; conta fora de 'activo' é recusada.
    pub async fn login(&self, correo: &str, contrasena: &str) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_email(correo)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.estado != UserStatus::Activo {
            return Err(AppError::Forbidden("Usuario inactivo".into()));
        }

        let password = contrasena.to_owned();
        let stored_hash = user.contrasena.clone();
        let is_valid = tokio::task::spawn_blocking(move || verify(&password, &stored_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação: {}", e))??;

        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Checagem de sessão legada: só confirma que o usuário existe.
    pub async fn verify(&self, user_id: Uuid) -> Result<User, AppError> {
        self.get_user_by_id(user_id).await
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))
    }

    pub async fn find_by_email(&self, correo: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_email(correo)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))
    }

    pub async fn find_by_document(&self, nro_documento: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_document(nro_documento)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))
    }

    /// Atualização parcial do perfil. Senha nova é re-hasheada; tipo e estado
    /// não são atualizáveis por aqui.
    pub async fn update_user(&self, id: Uuid, data: UpdateProfileData) -> Result<User, AppError> {
        let contrasena_hash = match data.contrasena {
            Some(plain) => Some(
                tokio::task::spawn_blocking(move || hash(&plain, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??,
            ),
            None => None,
        };

        self.user_repo
            .update_profile(
                &self.pool,
                id,
                data.nombres.as_deref(),
                data.apellidos.as_deref(),
                data.telefono.as_deref(),
                data.nro_documento.as_deref(),
                contrasena_hash.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))
    }

    pub async fn toggle_user_status(&self, id: Uuid, estado: &str) -> Result<User, AppError> {
        let estado: UserStatus = estado
            .parse()
            .map_err(|_| AppError::BadRequest("Estado no válido".into()))?;

        self.user_repo
            .update_status(&self.pool, id, estado)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))
    }
}
