// src/handlers/questionnaire.rs

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuestionnairePayload {
    /// Objeto livre pergunta -> resposta; a estrutura interna não é validada.
    pub responses: serde_json::Value,
    pub user_id: Option<Uuid>,
}

/// IP do cliente: atrás de proxy vale o primeiro hop de X-Forwarded-For,
/// senão o endereço da conexão.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .unwrap_or_else(|| addr.ip().to_string())
}

// POST /questionnaire/submit
#[utoipa::path(
    post,
    path = "/questionnaire/submit",
    tag = "Questionnaire",
    request_body = SubmitQuestionnairePayload,
    responses(
        (status = 201, description = "Respostas guardadas, devolve só o recibo"),
        (status = 400, description = "responses ausente ou não é um objeto JSON")
    )
)]
pub async fn submit(
    State(app_state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<SubmitQuestionnairePayload>,
) -> Result<impl IntoResponse, AppError> {
    let ip = client_ip(&headers, addr);

    let receipt = app_state
        .questionnaire_service
        .submit(payload.responses, payload.user_id, Some(ip))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Cuestionario enviado exitosamente", receipt)),
    ))
}

// GET /questionnaire/user/{userId}
#[utoipa::path(
    get,
    path = "/questionnaire/user/{user_id}",
    tag = "Questionnaire",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, description = "Questionários do usuário, mais recentes primeiro"))
)]
pub async fn get_user_questionnaires(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let questionnaires = app_state
        .questionnaire_service
        .get_user_questionnaires(user_id)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(questionnaires))))
}

// GET /questionnaire/user/{userId}/count
#[utoipa::path(
    get,
    path = "/questionnaire/user/{user_id}/count",
    tag = "Questionnaire",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, description = "Quantos questionários o usuário já enviou"))
)]
pub async fn get_count(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state.questionnaire_service.count_for_user(user_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(count))))
}

// ---
// Rotas de admin (protegidas pelo admin_guard)
// ---

// GET /questionnaire/admin/all
#[utoipa::path(
    get,
    path = "/questionnaire/admin/all",
    tag = "Questionnaire",
    responses(
        (status = 200, description = "Todos os questionários da base"),
        (status = 403, description = "Requer rol de administrador")
    )
)]
pub async fn get_all(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let questionnaires = app_state.questionnaire_service.get_all().await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(questionnaires))))
}

// GET /questionnaire/admin/{id}
#[utoipa::path(
    get,
    path = "/questionnaire/admin/{id}",
    tag = "Questionnaire",
    params(("id" = Uuid, Path, description = "ID do questionário")),
    responses(
        (status = 200, description = "Questionário completo, com as respostas"),
        (status = 403, description = "Requer rol de administrador"),
        (status = 404, description = "Questionário não existe")
    )
)]
pub async fn get_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let questionnaire = app_state.questionnaire_service.get_by_id(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(questionnaire))))
}

// DELETE /questionnaire/admin/{id}
#[utoipa::path(
    delete,
    path = "/questionnaire/admin/{id}",
    tag = "Questionnaire",
    params(("id" = Uuid, Path, description = "ID do questionário")),
    responses(
        (status = 200, description = "Questionário removido"),
        (status = 403, description = "Requer rol de administrador"),
        (status = 404, description = "Questionário não existe")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.questionnaire_service.delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::message("Cuestionario eliminado exitosamente")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        assert_eq!(client_ip(&headers, addr), "203.0.113.7");
    }

    #[test]
    fn client_ip_falls_back_to_peer_addr() {
        let headers = HeaderMap::new();
        let addr: SocketAddr = "192.168.1.5:4321".parse().unwrap();
        assert_eq!(client_ip(&headers, addr), "192.168.1.5");
    }
}
