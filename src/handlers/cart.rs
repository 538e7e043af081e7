// src/handlers/cart.rs

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
};

fn default_quantity() -> i32 {
    1
}

// GET /cart/{userId}
// Cria o carrinho vazio na primeira consulta: a operação é idempotente.
#[utoipa::path(
    get,
    path = "/cart/{user_id}",
    tag = "Cart",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, description = "Carrinho ativo do usuário"))
)]
pub async fn get_cart(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cart = app_state
        .cart_service
        .get_or_create_active_cart(user_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Carrito obtenido exitosamente", cart)),
    ))
}

// ---
// Payload: AddToCart
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
    pub user_id: Uuid,
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

// POST /cart/add
#[utoipa::path(
    post,
    path = "/cart/add",
    tag = "Cart",
    request_body = AddToCartPayload,
    responses(
        (status = 200, description = "Produto adicionado ao carrinho"),
        (status = 404, description = "Produto não existe"),
        (status = 409, description = "Estoque insuficiente")
    )
)]
pub async fn add_to_cart(
    State(app_state): State<AppState>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cart = app_state
        .cart_service
        .add_product_to_cart(payload.user_id, payload.product_id, payload.quantity)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Producto agregado al carrito exitosamente", cart)),
    ))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemPayload {
    #[validate(range(min = 1, message = "Cantidad válida requerida"))]
    pub quantity: i32,
}

// PUT /cart/item/{cartItemId}
#[utoipa::path(
    put,
    path = "/cart/item/{cart_item_id}",
    tag = "Cart",
    request_body = UpdateCartItemPayload,
    params(("cart_item_id" = Uuid, Path, description = "ID do item do carrinho")),
    responses(
        (status = 200, description = "Quantidade atualizada"),
        (status = 404, description = "Item não existe"),
        (status = 409, description = "Estoque insuficiente")
    )
)]
pub async fn update_cart_item(
    State(app_state): State<AppState>,
    Path(cart_item_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cart = app_state
        .cart_service
        .update_cart_item_quantity(cart_item_id, payload.quantity)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Item del carrito actualizado exitosamente", cart)),
    ))
}

// DELETE /cart/item/{cartItemId}
#[utoipa::path(
    delete,
    path = "/cart/item/{cart_item_id}",
    tag = "Cart",
    params(("cart_item_id" = Uuid, Path, description = "ID do item do carrinho")),
    responses(
        (status = 200, description = "Item removido"),
        (status = 404, description = "Item não existe")
    )
)]
pub async fn remove_cart_item(
    State(app_state): State<AppState>,
    Path(cart_item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cart = app_state.cart_service.remove_cart_item(cart_item_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Item eliminado del carrito exitosamente", cart)),
    ))
}

// DELETE /cart/clear/{userId}
#[utoipa::path(
    delete,
    path = "/cart/clear/{user_id}",
    tag = "Cart",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Carrinho esvaziado"),
        (status = 404, description = "Nenhum carrinho ativo")
    )
)]
pub async fn clear_cart(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cart = app_state.cart_service.clear_cart(user_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Carrito limpiado exitosamente", cart)),
    ))
}
