// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PaginationParams, response::ApiResponse},
    config::AppState,
    services::order_service::CheckoutData,
};

const DEFAULT_PAGE_SIZE: i64 = 10;

// ---
// Payload: Checkout
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub user_id: Uuid,

    /// Token simbólico: beso, baila, foto, abrazo ou sonrisa.
    #[validate(length(min = 1, message = "El método de pago es requerido."))]
    pub payment_method: String,

    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

// POST /order/checkout
#[utoipa::path(
    post,
    path = "/order/checkout",
    tag = "Orders",
    request_body = CheckoutPayload,
    responses(
        (status = 201, description = "Pedido criado a partir do carrinho ativo"),
        (status = 400, description = "Método de pagamento inválido ou carrinho vazio"),
        (status = 404, description = "Nenhum carrinho ativo"),
        (status = 409, description = "Estoque insuficiente para alguma linha")
    )
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state
        .order_service
        .process_checkout(
            payload.user_id,
            CheckoutData {
                payment_method: payload.payment_method,
                delivery_address: payload.delivery_address,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Orden creada exitosamente", order)),
    ))
}

// GET /order/{orderId}
#[utoipa::path(
    get,
    path = "/order/{order_id}",
    tag = "Orders",
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens e usuário"),
        (status = 404, description = "Pedido não existe")
    )
)]
pub async fn get_order_by_id(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get_order_by_id(order_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(order))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    #[validate(length(min = 1, message = "El estado es requerido."))]
    pub status: String,
}

// PUT /order/{orderId}/status
#[utoipa::path(
    put,
    path = "/order/{order_id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Status atualizado"),
        (status = 409, description = "Transição de estado inválida")
    )
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state
        .order_service
        .update_order_status(order_id, &payload.status)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Estado de orden actualizado exitosamente", order)),
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderPayload {
    pub user_id: Uuid,
}

// DELETE /order/{orderId}/cancel
#[utoipa::path(
    delete,
    path = "/order/{order_id}/cancel",
    tag = "Orders",
    request_body = CancelOrderPayload,
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido cancelado, estoque devolvido"),
        (status = 404, description = "Pedido não existe ou não é do usuário"),
        (status = 409, description = "Pedido já enviado, entregue ou cancelado")
    )
)]
pub async fn cancel_order(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<CancelOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .cancel_order(order_id, payload.user_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Orden cancelada exitosamente", order)),
    ))
}

// GET /orders/{userId}?page&limit
#[utoipa::path(
    get,
    path = "/orders/{user_id}",
    tag = "Orders",
    params(
        ("user_id" = Uuid, Path, description = "ID do usuário"),
        PaginationParams
    ),
    responses((status = 200, description = "Pedidos do usuário, mais recentes primeiro"))
)]
pub async fn get_user_orders(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = params.normalize(DEFAULT_PAGE_SIZE);

    let orders = app_state
        .order_service
        .get_user_orders(user_id, page, limit, offset)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::data(orders))))
}

// GET /orders/stats
#[utoipa::path(
    get,
    path = "/orders/stats",
    tag = "Orders",
    responses((status = 200, description = "Agregado por status da loja inteira"))
)]
pub async fn get_order_stats_global(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.order_service.get_order_stats(None).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(stats))))
}

// GET /orders/stats/{userId}
#[utoipa::path(
    get,
    path = "/orders/stats/{user_id}",
    tag = "Orders",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, description = "Agregado por status dos pedidos do usuário"))
)]
pub async fn get_order_stats_for_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.order_service.get_order_stats(Some(user_id)).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(stats))))
}
