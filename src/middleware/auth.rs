// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::user::{User, UserStatus, UserType},
};

// O usuário validado pelo guard, disponível via Extension nos handlers.
#[derive(Clone)]
pub struct AuthenticatedUser(pub User);

// Identificação não-criptográfica por enquanto: o cliente manda o próprio id
// no header X-User-Id e o guard confirma que a conta existe e está ativa.
fn user_id_from_headers(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("ID de usuario requerido".into()))?;
    raw.parse()
        .map_err(|_| AppError::BadRequest("ID de usuario inválido".into()))
}

async fn load_active_user(app_state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let user_id = user_id_from_headers(headers)?;
    let user = app_state.user_service.get_user_by_id(user_id).await?;
    if user.estado != UserStatus::Activo {
        return Err(AppError::Forbidden("Usuario inactivo".into()));
    }
    Ok(user)
}

/// Guard das rotas de admin do cuestionario.
pub async fn admin_guard(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = load_active_user(&app_state, req.headers()).await?;

    if user.tipo != UserType::Admin {
        return Err(AppError::Forbidden(
            "Se requiere rol de administrador".into(),
        ));
    }

    req.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(req).await)
}
