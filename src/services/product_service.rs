// src/services/product_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Page},
    db::ProductRepository,
    models::product::{Product, StockCheck},
};

const RELATED_LIMIT: i64 = 4;

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { product_repo, pool }
    }

    pub async fn get_all_products(
        &self,
        page: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Page<Product>, AppError> {
        let products = self.product_repo.list(limit, offset).await?;
        let total = self.product_repo.count().await?;
        Ok(Page::new(products, total, page, limit))
    }

    pub async fn get_product_by_id(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Producto no encontrado".into()))
    }

    pub async fn search_products(
        &self,
        term: &str,
        page: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Page<Product>, AppError> {
        let products = self.product_repo.search(term, limit, offset).await?;
        let total = self.product_repo.count_search(term).await?;
        Ok(Page::new(products, total, page, limit))
    }

    pub async fn get_products_by_category(
        &self,
        category: &str,
        page: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Page<Product>, AppError> {
        let products = self.product_repo.list_by_category(category, limit, offset).await?;
        let total = self.product_repo.count_by_category(category).await?;
        Ok(Page::new(products, total, page, limit))
    }

    pub async fn get_categories(&self) -> Result<Vec<String>, AppError> {
        self.product_repo.categories().await
    }

    /// Produtos da mesma categoria, excluindo o consultado.
    pub async fn get_related_products(&self, product_id: Uuid) -> Result<Vec<Product>, AppError> {
        let product = self.get_product_by_id(product_id).await?;
        self.product_repo
            .related(&product.category, product.id, RELATED_LIMIT)
            .await
    }

    /// Relatório de disponibilidade usado pela página de produto antes do
    /// add-to-cart. Não reserva nada.
    pub async fn check_stock(&self, product_id: Uuid, quantity: i32) -> Result<StockCheck, AppError> {
        let product = self.get_product_by_id(product_id).await?;
        Ok(StockCheck {
            available: product.stock >= quantity,
            stock: product.stock,
            requested: quantity,
        })
    }
}
