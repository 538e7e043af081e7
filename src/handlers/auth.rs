// src/handlers/auth.rs

use axum::{Json, extract::Query, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    services::user_service::RegisterData,
};

// ---
// Payload: Register
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "El campo 'nombres' es obligatorio."))]
    pub nombres: String,

    #[validate(length(min = 1, message = "El campo 'apellidos' es obligatorio."))]
    pub apellidos: String,

    #[validate(email(message = "Formato de correo electrónico inválido"))]
    pub correo: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub contrasena: String,

    pub nro_documento: Option<String>,
    pub telefono: Option<String>,
}

// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Usuário registrado"),
        (status = 409, description = "Correo ou documento já registrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .register(RegisterData {
            nombres: payload.nombres,
            apellidos: payload.apellidos,
            correo: payload.correo,
            contrasena: payload.contrasena,
            nro_documento: payload.nro_documento,
            telefono: payload.telefono,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Usuario registrado exitosamente", user)),
    ))
}

// ---
// Payload: Login
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "El correo es requerido."))]
    pub correo: String,

    #[validate(length(min = 1, message = "La contraseña es requerida."))]
    pub contrasena: String,
}

// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão iniciada"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .login(&payload.correo, &payload.contrasena)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Inicio de sesión exitoso", user)),
    ))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VerifyParams {
    pub user_id: Uuid,
}

// GET /auth/verify?userId=
// Checagem de sessão legada, sem criptografia por enquanto.
#[utoipa::path(
    get,
    path = "/auth/verify",
    tag = "Auth",
    params(VerifyParams),
    responses(
        (status = 200, description = "Usuário verificado"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn verify(
    State(app_state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.verify(params.user_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Usuario verificado", user)),
    ))
}
