// src/db/cart_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cart::{Cart, CartItem, CartStatus},
};

#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, cart_id: Uuid) -> Result<Option<Cart>, AppError> {
        let cart = sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE id = $1")
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cart)
    }

    pub async fn find_active_by_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<Cart>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT * FROM carts WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(cart)
    }

    /// Tenta criar o carrinho ativo do usuário. Graças ao índice único parcial,
    /// uma corrida entre duas requisições termina com UM carrinho: o perdedor
    /// recebe None aqui e relê o vencedor.
    pub async fn insert_active<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<Cart>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (user_id, status, total)
            VALUES ($1, 'active', 0.00)
            ON CONFLICT (user_id) WHERE status = 'active' DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(cart)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
        status: CartStatus,
    ) -> Result<Cart, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cart = sqlx::query_as::<_, Cart>(
            "UPDATE carts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(cart_id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(cart)
    }

    /// Recalcula o total a partir dos itens, dentro da mesma transação da
    /// mutação. Carrinho vazio volta a 0.
    pub async fn recompute_total<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE carts
            SET total = COALESCE(
                    (SELECT SUM(total_price) FROM cart_items WHERE cart_id = $1),
                    0.00
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING total
            "#,
        )
        .bind(cart_id)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    // ---
    // Itens do carrinho
    // ---

    pub async fn items_for_cart<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
    ) -> Result<Vec<CartItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE cart_id = $1 ORDER BY created_at ASC",
        )
        .bind(cart_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn find_item<'e, E>(
        &self,
        executor: E,
        cart_item_id: Uuid,
    ) -> Result<Option<CartItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE id = $1")
            .bind(cart_item_id)
            .fetch_optional(executor)
            .await?;
        Ok(item)
    }

    pub async fn find_item_by_product<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
        total_price: Decimal,
    ) -> Result<CartItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity, unit_price, total_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(total_price)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn update_item_quantity<'e, E>(
        &self,
        executor: E,
        cart_item_id: Uuid,
        quantity: i32,
        total_price: Decimal,
    ) -> Result<CartItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = $2, total_price = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(cart_item_id)
        .bind(quantity)
        .bind(total_price)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete_item<'e, E>(&self, executor: E, cart_item_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(cart_item_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_items_for_cart<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
