// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{Order, OrderItem, OrderStat, OrderStatus, PaymentMethod},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria o pedido a partir do carrinho. O total financeiro é congelado aqui
    /// e nunca mais muda. Pagamento simbólico: payment_status já nasce
    /// 'completed', não existe gateway externo.
    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        cart_id: Uuid,
        total: Decimal,
        payment_method: PaymentMethod,
        delivery_address: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (user_id, cart_id, total, payment_method, payment_status, status,
                 delivery_address, notes)
            VALUES ($1, $2, $3, $4, 'completed', 'processing', $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(cart_id)
        .bind(total)
        .bind(payment_method)
        .bind(delivery_address)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
        total_price: Decimal,
        product_snapshot: serde_json::Value,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items
                (order_id, product_id, quantity, unit_price, total_price, product_snapshot)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(total_price)
        .bind(product_snapshot)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    /// Busca restrita ao dono: cancelamento exige que o pedido pertença
    /// ao usuário que pediu.
    pub async fn find_by_id_for_user<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
            .bind(order_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn items_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at ASC",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(order_id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    /// Agregado por status; user_id nulo agrega a loja inteira.
    pub async fn stats(&self, user_id: Option<Uuid>) -> Result<Vec<OrderStat>, AppError> {
        let stats = sqlx::query_as::<_, OrderStat>(
            r#"
            SELECT status, COUNT(*) AS count, SUM(total) AS total_amount
            FROM orders
            WHERE ($1::uuid IS NULL OR user_id = $1)
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }
}
