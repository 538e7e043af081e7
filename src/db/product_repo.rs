// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::product::Product};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Busca vários produtos de uma vez (usado pelo carrinho e pelo checkout).
    pub async fn find_by_ids<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // Busca textual simples com ILIKE sobre os campos descritivos.
    pub async fn search(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        let pattern = format!("%{}%", term);
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE title ILIKE $1 OR description ILIKE $1 OR category ILIKE $1 OR surprise ILIKE $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count_search(&self, term: &str) -> Result<i64, AppError> {
        let pattern = format!("%{}%", term);
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE title ILIKE $1 OR description ILIKE $1 OR category ILIKE $1 OR surprise ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn list_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE category = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(category)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count_by_category(&self, category: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category = $1")
            .bind(category)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn categories(&self) -> Result<Vec<String>, AppError> {
        let categories =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM products ORDER BY category ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    /// Produtos da mesma categoria, excluindo o próprio.
    pub async fn related(
        &self,
        category: &str,
        exclude_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE category = $1 AND id <> $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(category)
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---

    /// Baixa de estoque relativa (stock = stock - qty), com guarda no WHERE.
    /// Retorna None quando o estoque é insuficiente no momento do UPDATE,
    /// o que protege contra checkouts concorrentes do mesmo produto.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    /// Devolução de estoque no cancelamento (stock = stock + qty).
    pub async fn restore_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET stock = stock + $2, updated_at = NOW() WHERE id = $1")
            .bind(product_id)
            .bind(quantity)
            .execute(executor)
            .await?;
        Ok(())
    }
}
