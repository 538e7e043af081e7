// src/services/order_service.rs

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Page},
    db::{OrderRepository, ProductRepository, UserRepository},
    models::order::{Order, OrderStat, OrderStatus, OrderWithItems, PaymentMethod, ProductSnapshot},
    services::CartService,
};

pub struct CheckoutData {
    pub payment_method: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    product_repo: ProductRepository,
    user_repo: UserRepository,
    cart_service: CartService,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        product_repo: ProductRepository,
        user_repo: UserRepository,
        cart_service: CartService,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            product_repo,
            user_repo,
            cart_service,
            pool,
        }
    }

    /// Converte o carrinho ativo do usuário em um pedido imutável.
    ///
    /// Tudo-ou-nada: pedido, itens com snapshot do produto, baixa de estoque e
    /// o carrinho marcado como 'completed' acontecem na MESMA transação; se
    /// qualquer passo falhar, nada é persistido e o carrinho continua ativo.
    pub async fn process_checkout(
        &self,
        user_id: Uuid,
        data: CheckoutData,
    ) -> Result<OrderWithItems, AppError> {
        // Pagamento simbólico: só os tokens do enum valem.
        let payment_method: PaymentMethod = data
            .payment_method
            .parse()
            .map_err(|_| AppError::BadRequest("Método de pago no válido".into()))?;

        let mut tx = self.pool.begin().await?;

        let cart = self
            .cart_service
            .active_cart_in_tx(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No hay carrito activo para el usuario".into()))?;

        let items = self.cart_service.items_in_tx(&mut tx, cart.id).await?;
        if items.is_empty() {
            return Err(AppError::BadRequest("El carrito está vacío".into()));
        }

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products: HashMap<Uuid, _> = self
            .product_repo
            .find_by_ids(&mut *tx, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // Revalida o estoque de TODAS as linhas antes de criar qualquer coisa.
        for item in &items {
            let product = products.get(&item.product_id).ok_or_else(|| {
                AppError::NotFound("Producto no encontrado".into())
            })?;
            if product.stock < item.quantity {
                return Err(AppError::Conflict(format!(
                    "Stock insuficiente para {}. Disponible: {}",
                    product.title, product.stock
                )));
            }
        }

        // Total financeiro congelado a partir do carrinho.
        let order = self
            .order_repo
            .insert_order(
                &mut *tx,
                user_id,
                cart.id,
                cart.total,
                payment_method,
                data.delivery_address.as_deref(),
                data.notes.as_deref(),
            )
            .await?;

        for item in &items {
            let product = &products[&item.product_id];
            let snapshot = serde_json::to_value(ProductSnapshot::from(product))
                .map_err(|e| AppError::Internal(e.into()))?;

            self.order_repo
                .insert_item(
                    &mut *tx,
                    order.id,
                    item.product_id,
                    item.quantity,
                    item.unit_price,
                    item.total_price,
                    snapshot,
                )
                .await?;

            // UPDATE relativo com guarda: se um checkout concorrente levou o
            // estoque abaixo da quantidade, a transação inteira aborta.
            let remaining = self
                .product_repo
                .decrement_stock(&mut *tx, item.product_id, item.quantity)
                .await?;
            if remaining.is_none() {
                return Err(AppError::Conflict(format!(
                    "Stock insuficiente para {}. Disponible: {}",
                    product.title, product.stock
                )));
            }
        }

        self.cart_service.complete_cart(&mut *tx, cart.id).await?;

        tx.commit().await?;
        tracing::info!("✅ Checkout concluído: pedido {} do usuário {}", order.id, user_id);

        self.get_order_by_id(order.id).await
    }

    pub async fn get_order_by_id(&self, order_id: Uuid) -> Result<OrderWithItems, AppError> {
        let order = self
            .order_repo
            .find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".into()))?;

        let items = self.order_repo.items_for_order(&self.pool, order_id).await?;
        let user = self.user_repo.summary_by_id(&self.pool, order.user_id).await?;

        Ok(OrderWithItems { order, items, user })
    }

    pub async fn get_user_orders(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Page<OrderWithItems>, AppError> {
        let orders = self.order_repo.list_for_user(user_id, limit, offset).await?;
        let total = self.order_repo.count_for_user(user_id).await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.order_repo.items_for_order(&self.pool, order.id).await?;
            result.push(OrderWithItems {
                order,
                items,
                user: None,
            });
        }

        Ok(Page::new(result, total, page, limit))
    }

    /// Avança o status pela máquina de estados. Transição para 'cancelled'
    /// passa pelo mesmo caminho que devolve o estoque.
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        status: &str,
    ) -> Result<OrderWithItems, AppError> {
        let next: OrderStatus = status
            .parse()
            .map_err(|_| AppError::BadRequest("Estado no válido".into()))?;

        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".into()))?;

        if !order.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Transición de estado no válida: {} a {}",
                order.status, next
            )));
        }

        if next == OrderStatus::Cancelled {
            self.cancel_in_tx(&mut tx, &order).await?;
        } else {
            self.order_repo.update_status(&mut *tx, order_id, next).await?;
        }

        tx.commit().await?;
        self.get_order_by_id(order_id).await
    }

    /// Cancela um pedido do próprio usuário, devolvendo o estoque de cada item
    /// na mesma transação do flip de status. Pedido enviado ou entregue não
    /// pode mais ser cancelado.
    pub async fn cancel_order(&self, order_id: Uuid, user_id: Uuid) -> Result<OrderWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id_for_user(&mut *tx, order_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Orden no encontrada o no pertenece al usuario".into())
            })?;

        if order.status == OrderStatus::Cancelled {
            return Err(AppError::Conflict("La orden ya está cancelada".into()));
        }
        if !order.status.is_cancellable() {
            return Err(AppError::Conflict(
                "No se puede cancelar una orden que ya fue enviada o entregada".into(),
            ));
        }

        self.cancel_in_tx(&mut tx, &order).await?;
        tx.commit().await?;

        self.get_order_by_id(order_id).await
    }

    async fn cancel_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), AppError> {
        let items = self.order_repo.items_for_order(&mut **tx, order.id).await?;
        for item in &items {
            self.product_repo
                .restore_stock(&mut **tx, item.product_id, item.quantity)
                .await?;
        }
        self.order_repo
            .update_status(&mut **tx, order.id, OrderStatus::Cancelled)
            .await?;
        Ok(())
    }

    pub async fn get_order_stats(&self, user_id: Option<Uuid>) -> Result<Vec<OrderStat>, AppError> {
        self.order_repo.stats(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::db::CartRepository;
    use crate::models::cart::CartStatus;
    use crate::models::order::PaymentStatus;

    fn services(pool: &PgPool) -> (CartService, OrderService) {
        let product_repo = ProductRepository::new(pool.clone());
        let cart_service = CartService::new(
            CartRepository::new(pool.clone()),
            product_repo.clone(),
            pool.clone(),
        );
        let order_service = OrderService::new(
            OrderRepository::new(pool.clone()),
            product_repo,
            UserRepository::new(pool.clone()),
            cart_service.clone(),
            pool.clone(),
        );
        (cart_service, order_service)
    }

    async fn seed_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (nombres, apellidos, correo, contrasena)
             VALUES ('Ana', 'Pérez', $1, 'hash') RETURNING id",
        )
        .bind(format!("{}@example.com", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .expect("usuário de teste")
    }

    async fn seed_product(pool: &PgPool, title: &str, price: Decimal, stock: i32) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO products (title, price, image, description, surprise, category, stock)
             VALUES ($1, $2, '/img/regalo.png', 'Un regalo', 'Sorpresa', 'regalos', $3)
             RETURNING id",
        )
        .bind(title)
        .bind(price)
        .bind(stock)
        .fetch_one(pool)
        .await
        .expect("produto de teste")
    }

    async fn product_stock(pool: &PgPool, id: Uuid) -> i32 {
        sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn checkout_data(method: &str) -> CheckoutData {
        CheckoutData {
            payment_method: method.into(),
            delivery_address: Some("Calle 123".into()),
            notes: None,
        }
    }

    #[sqlx::test]
    async fn checkout_freezes_total_decrements_stock_and_completes_cart(pool: PgPool) {
        let (cart_service, order_service) = services(&pool);
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool, "Oso de peluche", dec!(25.00), 5).await;

        cart_service
            .add_product_to_cart(user_id, product_id, 3)
            .await
            .unwrap();

        let order = order_service
            .process_checkout(user_id, checkout_data("beso"))
            .await
            .unwrap();

        assert_eq!(order.order.total, dec!(75.00));
        assert_eq!(order.order.status, OrderStatus::Processing);
        assert_eq!(order.order.payment_status, PaymentStatus::Completed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert!(order.items[0].product_snapshot.is_some());

        // Exatamente a quantidade pedida saiu do estoque.
        assert_eq!(product_stock(&pool, product_id).await, 2);

        // O carrinho de origem fechou; a próxima consulta cria um novo.
        let cart_status: CartStatus =
            sqlx::query_scalar("SELECT status FROM carts WHERE id = $1")
                .bind(order.order.cart_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(cart_status, CartStatus::Completed);

        let fresh = cart_service.get_or_create_active_cart(user_id).await.unwrap();
        assert_ne!(fresh.cart.id, order.order.cart_id);
        assert!(fresh.items.is_empty());
    }

    #[sqlx::test]
    async fn checkout_aborts_whole_order_when_any_line_lacks_stock(pool: PgPool) {
        let (cart_service, order_service) = services(&pool);
        let user_id = seed_user(&pool).await;
        let oso = seed_product(&pool, "Oso de peluche", dec!(25.00), 5).await;
        let flores = seed_product(&pool, "Ramo de flores", dec!(10.50), 5).await;

        cart_service.add_product_to_cart(user_id, oso, 2).await.unwrap();
        cart_service.add_product_to_cart(user_id, flores, 4).await.unwrap();

        // Outra venda levou o estoque da segunda linha abaixo do pedido.
        sqlx::query("UPDATE products SET stock = 1 WHERE id = $1")
            .bind(flores)
            .execute(&pool)
            .await
            .unwrap();

        let err = order_service
            .process_checkout(user_id, checkout_data("abrazo"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Nada persistiu: sem pedido, estoques intocados, carrinho segue ativo.
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orders, 0);
        assert_eq!(product_stock(&pool, oso).await, 5);
        assert_eq!(product_stock(&pool, flores).await, 1);

        let cart = cart_service.get_or_create_active_cart(user_id).await.unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[sqlx::test]
    async fn checkout_rejects_unknown_payment_and_empty_cart(pool: PgPool) {
        let (cart_service, order_service) = services(&pool);
        let user_id = seed_user(&pool).await;

        let err = order_service
            .process_checkout(user_id, checkout_data("efectivo"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        cart_service.get_or_create_active_cart(user_id).await.unwrap();
        let err = order_service
            .process_checkout(user_id, checkout_data("beso"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[sqlx::test]
    async fn cancel_restores_stock_exactly_once(pool: PgPool) {
        let (cart_service, order_service) = services(&pool);
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool, "Oso de peluche", dec!(25.00), 5).await;

        cart_service
            .add_product_to_cart(user_id, product_id, 2)
            .await
            .unwrap();
        let order = order_service
            .process_checkout(user_id, checkout_data("sonrisa"))
            .await
            .unwrap();
        assert_eq!(product_stock(&pool, product_id).await, 3);

        // Outro usuário não pode cancelar o pedido.
        let intruder = seed_user(&pool).await;
        let err = order_service
            .cancel_order(order.order.id, intruder)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let cancelled = order_service
            .cancel_order(order.order.id, user_id)
            .await
            .unwrap();
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert_eq!(product_stock(&pool, product_id).await, 5);

        // Cancelado é terminal; o estoque não volta duas vezes.
        let err = order_service
            .cancel_order(order.order.id, user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(product_stock(&pool, product_id).await, 5);
    }

    #[sqlx::test]
    async fn shipped_orders_cannot_be_cancelled(pool: PgPool) {
        let (cart_service, order_service) = services(&pool);
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool, "Oso de peluche", dec!(25.00), 5).await;

        cart_service
            .add_product_to_cart(user_id, product_id, 2)
            .await
            .unwrap();
        let order = order_service
            .process_checkout(user_id, checkout_data("foto"))
            .await
            .unwrap();

        order_service
            .update_order_status(order.order.id, "confirmed")
            .await
            .unwrap();
        order_service
            .update_order_status(order.order.id, "shipped")
            .await
            .unwrap();

        let err = order_service
            .cancel_order(order.order.id, user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(product_stock(&pool, product_id).await, 3);
    }

    #[sqlx::test]
    async fn status_update_to_cancelled_restores_stock_too(pool: PgPool) {
        let (cart_service, order_service) = services(&pool);
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool, "Oso de peluche", dec!(25.00), 5).await;

        cart_service
            .add_product_to_cart(user_id, product_id, 2)
            .await
            .unwrap();
        let order = order_service
            .process_checkout(user_id, checkout_data("baila"))
            .await
            .unwrap();
        assert_eq!(product_stock(&pool, product_id).await, 3);

        let cancelled = order_service
            .update_order_status(order.order.id, "cancelled")
            .await
            .unwrap();
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert_eq!(product_stock(&pool, product_id).await, 5);
    }
}
