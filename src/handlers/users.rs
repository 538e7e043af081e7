// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    services::user_service::UpdateProfileData,
};

// GET /user/{userId}
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Perfil do usuário, sem a senha"),
        (status = 404, description = "Usuário não existe")
    )
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get_user_by_id(user_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(user))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 2, message = "El nombre debe tener al menos 2 caracteres."))]
    pub nombres: Option<String>,

    #[validate(length(min = 2, message = "El apellido debe tener al menos 2 caracteres."))]
    pub apellidos: Option<String>,

    pub telefono: Option<String>,
    pub nro_documento: Option<String>,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub contrasena: Option<String>,
}

// PUT /user/{userId}
#[utoipa::path(
    put,
    path = "/user/{user_id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Perfil atualizado"),
        (status = 404, description = "Usuário não existe"),
        (status = 409, description = "Correo ou documento já usados por outra conta")
    )
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .update_user(
            user_id,
            UpdateProfileData {
                nombres: payload.nombres,
                apellidos: payload.apellidos,
                telefono: payload.telefono,
                nro_documento: payload.nro_documento,
                contrasena: payload.contrasena,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Usuario actualizado exitosamente", user)),
    ))
}

// GET /user/email/{correo}
#[utoipa::path(
    get,
    path = "/user/email/{correo}",
    tag = "Users",
    params(("correo" = String, Path, description = "Correo electrónico")),
    responses(
        (status = 200, description = "Usuário encontrado"),
        (status = 404, description = "Nenhum usuário com esse correo")
    )
)]
pub async fn find_by_email(
    State(app_state): State<AppState>,
    Path(correo): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.find_by_email(&correo).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(user))))
}

// GET /user/document/{nroDocumento}
#[utoipa::path(
    get,
    path = "/user/document/{nro_documento}",
    tag = "Users",
    params(("nro_documento" = String, Path, description = "Número de documento")),
    responses(
        (status = 200, description = "Usuário encontrado"),
        (status = 404, description = "Nenhum usuário com esse documento")
    )
)]
pub async fn find_by_document(
    State(app_state): State<AppState>,
    Path(nro_documento): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.find_by_document(&nro_documento).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(user))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ToggleStatusPayload {
    /// activo, inactivo ou suspendido.
    #[validate(length(min = 1, message = "El estado es requerido."))]
    pub status: String,
}

// PUT /user/{userId}/status
#[utoipa::path(
    put,
    path = "/user/{user_id}/status",
    tag = "Users",
    request_body = ToggleStatusPayload,
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Estado da conta alterado"),
        (status = 400, description = "Estado desconhecido"),
        (status = 404, description = "Usuário não existe")
    )
)]
pub async fn toggle_user_status(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ToggleStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .toggle_user_status(user_id, &payload.status)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Estado de usuario actualizado exitosamente", user)),
    ))
}
