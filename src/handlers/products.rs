// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PaginationParams, response::ApiResponse},
    config::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 20;

// GET /products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(PaginationParams),
    responses((status = 200, description = "Listado paginado do catálogo"))
)]
pub async fn get_products(
    State(app_state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = params.normalize(DEFAULT_PAGE_SIZE);

    let products = app_state
        .product_service
        .get_all_products(page, limit, offset)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::data(products))))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Termo de busca (título, descrição, categoria ou surpresa).
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// GET /products/search?q=
#[utoipa::path(
    get,
    path = "/products/search",
    tag = "Products",
    params(SearchParams),
    responses((status = 200, description = "Resultados da busca"))
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let term = params.q.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("El término de búsqueda es requerido".into()));
    }

    let pagination = PaginationParams {
        page: params.page,
        limit: params.limit,
    };
    let (page, limit, offset) = pagination.normalize(DEFAULT_PAGE_SIZE);

    let products = app_state
        .product_service
        .search_products(term, page, limit, offset)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::data(products))))
}

// GET /products/category/{category}
#[utoipa::path(
    get,
    path = "/products/category/{category}",
    tag = "Products",
    params(
        ("category" = String, Path, description = "Categoria do produto"),
        PaginationParams
    ),
    responses((status = 200, description = "Produtos da categoria"))
)]
pub async fn get_products_by_category(
    State(app_state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = params.normalize(DEFAULT_PAGE_SIZE);

    let products = app_state
        .product_service
        .get_products_by_category(&category, page, limit, offset)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::data(products))))
}

// GET /products/categories
#[utoipa::path(
    get,
    path = "/products/categories",
    tag = "Products",
    responses((status = 200, description = "Categorias disponíveis"))
)]
pub async fn get_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.product_service.get_categories().await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(categories))))
}

// GET /product/{id}
#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto encontrado"),
        (status = 404, description = "Produto não existe")
    )
)]
pub async fn get_product_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get_product_by_id(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(product))))
}

// GET /product/{id}/related
#[utoipa::path(
    get,
    path = "/product/{id}/related",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "Produtos relacionados da mesma categoria"))
)]
pub async fn get_related_products(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let related = app_state.product_service.get_related_products(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(related))))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StockParams {
    pub quantity: Option<i32>,
}

// GET /product/{id}/stock?quantity=
#[utoipa::path(
    get,
    path = "/product/{id}/stock",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        StockParams
    ),
    responses((status = 200, description = "Disponibilidade de estoque"))
)]
pub async fn check_stock(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<StockParams>,
) -> Result<impl IntoResponse, AppError> {
    let quantity = params.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("La cantidad debe ser mayor a 0".into()));
    }

    let check = app_state.product_service.check_stock(id, quantity).await?;
    Ok((StatusCode::OK, Json(ApiResponse::data(check))))
}
