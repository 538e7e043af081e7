// src/services/cart_service.rs

use std::collections::HashMap;

use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CartRepository, ProductRepository},
    models::cart::{self, Cart, CartItem, CartItemWithProduct, CartStatus, CartWithItems},
};

#[derive(Clone)]
pub struct CartService {
    cart_repo: CartRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl CartService {
    pub fn new(cart_repo: CartRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self {
            cart_repo,
            product_repo,
            pool,
        }
    }

    /// Devolve o carrinho ativo do usuário, criando um vazio se não existir.
    /// Idempotente: o índice único parcial garante no máximo um ativo, e uma
    /// corrida no INSERT cai no caminho de releitura.
    pub async fn get_or_create_active_cart(&self, user_id: Uuid) -> Result<CartWithItems, AppError> {
        let cart = self.get_or_create_active(&self.pool, user_id).await?;
        self.get_cart_with_items(cart.id).await
    }

    async fn get_or_create_active<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Cart, AppError>
    where
        E: Executor<'e, Database = Postgres> + Copy,
    {
        if let Some(cart) = self.cart_repo.find_active_by_user(executor, user_id).await? {
            return Ok(cart);
        }

        if let Some(cart) = self.cart_repo.insert_active(executor, user_id).await? {
            return Ok(cart);
        }

        // Outra requisição ganhou a corrida: o carrinho dela é o ativo.
        self.cart_repo
            .find_active_by_user(executor, user_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Carrito activo no encontrado".into()))
    }

    /// Adiciona (ou mescla) um produto ao carrinho ativo. Linha nova congela o
    /// preço atual do produto; linha existente soma quantidades e revalida o
    /// estoque contra o total mesclado. Tudo numa transação só, com o total do
    /// carrinho recalculado antes do commit.
    pub async fn add_product_to_cart(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartWithItems, AppError> {
        // O carrinho é resolvido ANTES do begin(): segurar a conexão da
        // transação e adquirir uma segunda esgota o pool sob concorrência.
        // Criado preguiçosamente, ele sobrevive a um rollback do item.
        let cart = self.get_or_create_active(&self.pool, user_id).await?;

        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .find_by_id(&mut *tx, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Producto no encontrado".into()))?;

        let existing = self
            .cart_repo
            .find_item_by_product(&mut *tx, cart.id, product_id)
            .await?;

        match existing {
            Some(item) => {
                let merged = item.quantity + quantity;
                if product.stock < merged {
                    return Err(AppError::Conflict(format!(
                        "Stock insuficiente. Disponible: {}",
                        product.stock
                    )));
                }
                let total = cart::line_total(item.unit_price, merged);
                self.cart_repo
                    .update_item_quantity(&mut *tx, item.id, merged, total)
                    .await?;
            }
            None => {
                if product.stock < quantity {
                    return Err(AppError::Conflict(format!(
                        "Stock insuficiente. Disponible: {}",
                        product.stock
                    )));
                }
                let total = cart::line_total(product.price, quantity);
                self.cart_repo
                    .insert_item(&mut *tx, cart.id, product_id, quantity, product.price, total)
                    .await?;
            }
        }

        self.cart_repo.recompute_total(&mut *tx, cart.id).await?;
        tx.commit().await?;

        self.get_cart_with_items(cart.id).await
    }

    pub async fn update_cart_item_quantity(
        &self,
        cart_item_id: Uuid,
        quantity: i32,
    ) -> Result<CartWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        let item = self
            .cart_repo
            .find_item(&mut *tx, cart_item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item del carrito no encontrado".into()))?;

        let product = self
            .product_repo
            .find_by_id(&mut *tx, item.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Producto no encontrado".into()))?;

        if product.stock < quantity {
            return Err(AppError::Conflict(format!(
                "Stock insuficiente. Disponible: {}",
                product.stock
            )));
        }

        let total = cart::line_total(item.unit_price, quantity);
        self.cart_repo
            .update_item_quantity(&mut *tx, item.id, quantity, total)
            .await?;
        self.cart_repo.recompute_total(&mut *tx, item.cart_id).await?;
        tx.commit().await?;

        self.get_cart_with_items(item.cart_id).await
    }

    pub async fn remove_cart_item(&self, cart_item_id: Uuid) -> Result<CartWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        let item = self
            .cart_repo
            .find_item(&mut *tx, cart_item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item del carrito no encontrado".into()))?;

        self.cart_repo.delete_item(&mut *tx, item.id).await?;
        // Pode voltar legitimamente a 0 com o carrinho vazio.
        self.cart_repo.recompute_total(&mut *tx, item.cart_id).await?;
        tx.commit().await?;

        self.get_cart_with_items(item.cart_id).await
    }

    /// Esvazia o carrinho ativo. O carrinho continua 'active' com total 0.
    pub async fn clear_cart(&self, user_id: Uuid) -> Result<CartWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        let cart = self
            .cart_repo
            .find_active_by_user(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Carrito activo no encontrado".into()))?;

        self.cart_repo.delete_items_for_cart(&mut *tx, cart.id).await?;
        self.cart_repo.recompute_total(&mut *tx, cart.id).await?;
        tx.commit().await?;

        self.get_cart_with_items(cart.id).await
    }

    /// Leituras usadas pelo checkout, dentro da transação do pedido.
    pub async fn active_cart_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<Option<Cart>, AppError> {
        self.cart_repo.find_active_by_user(&mut **tx, user_id).await
    }

    pub async fn items_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart_id: Uuid,
    ) -> Result<Vec<CartItem>, AppError> {
        self.cart_repo.items_for_cart(&mut **tx, cart_id).await
    }

    /// Marca o carrinho como 'completed'. Chamado apenas pelo checkout, dentro
    /// da transação do pedido — nunca diretamente por um handler.
    pub async fn complete_cart<'e, E>(&self, executor: E, cart_id: Uuid) -> Result<Cart, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.cart_repo
            .update_status(executor, cart_id, CartStatus::Completed)
            .await
    }

    /// Carrinho com itens e produtos embutidos, como o frontend consome.
    pub async fn get_cart_with_items(&self, cart_id: Uuid) -> Result<CartWithItems, AppError> {
        let cart = self
            .cart_repo
            .find_by_id(cart_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Carrito no encontrado".into()))?;

        let items = self.cart_repo.items_for_cart(&self.pool, cart_id).await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products: HashMap<Uuid, _> = self
            .product_repo
            .find_by_ids(&self.pool, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let items = items
            .into_iter()
            .filter_map(|item| {
                products.get(&item.product_id).cloned().map(|product| CartItemWithProduct {
                    item,
                    product,
                })
            })
            .collect();

        Ok(CartWithItems { cart, items })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

    use super::*;

    fn service(pool: &PgPool) -> CartService {
        CartService::new(
            CartRepository::new(pool.clone()),
            ProductRepository::new(pool.clone()),
            pool.clone(),
        )
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

    async fn seed_product(pool: &PgPool, price: Decimal, stock: i32) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO products (title, price, image, description, surprise, category, stock)
             VALUES ('Oso de peluche', $1, '/img/oso.png', 'Un oso suave', 'Abrazo', 'peluches', $2)
             RETURNING id",
        )
        .bind(price)
        .bind(stock)
        .fetch_one(pool)
        .await
        .expect("produto de teste")
    }

    #[sqlx::test]
    async fn user_has_at_most_one_active_cart(pool: PgPool) {
        let service = service(&pool);
        let user_id = seed_user(&pool).await;

        let first = service.get_or_create_active_cart(user_id).await.unwrap();
        let second = service.get_or_create_active_cart(user_id).await.unwrap();
        assert_eq!(first.cart.id, second.cart.id);

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM carts WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(active, 1);
    }

    #[sqlx::test]
    async fn cart_total_tracks_every_mutation(pool: PgPool) {
        let service = service(&pool);
        let user_id = seed_user(&pool).await;
        let oso = seed_product(&pool, dec!(25.00), 10).await;
        let flores = seed_product(&pool, dec!(10.50), 10).await;

        let cart = service.add_product_to_cart(user_id, oso, 2).await.unwrap();
        assert_eq!(cart.cart.total, dec!(50.00));

        let cart = service.add_product_to_cart(user_id, flores, 1).await.unwrap();
        assert_eq!(cart.cart.total, dec!(60.50));

        let oso_item = cart
            .items
            .iter()
            .find(|i| i.item.product_id == oso)
            .unwrap()
            .item
            .id;
        let cart = service.update_cart_item_quantity(oso_item, 3).await.unwrap();
        assert_eq!(cart.cart.total, dec!(85.50));

        let cart = service.remove_cart_item(oso_item).await.unwrap();
        assert_eq!(cart.cart.total, dec!(10.50));

        let cart = service.clear_cart(user_id).await.unwrap();
        assert_eq!(cart.cart.total, dec!(0));
        assert!(cart.items.is_empty());
        assert_eq!(cart.cart.status, CartStatus::Active);
    }

    // Regressão: o fluxo inteiro do add-to-cart tem de caber numa conexão só.
    // Com o pool reduzido a 1, pedir uma segunda conexão enquanto a transação
    // segura a primeira travaria até o acquire_timeout.
    #[sqlx::test]
    async fn add_to_cart_completes_with_a_single_connection(
        pool_opts: PgPoolOptions,
        connect_opts: PgConnectOptions,
    ) {
        let pool = pool_opts
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect_with(connect_opts)
            .await
            .expect("pool de teste");

        let service = service(&pool);
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool, dec!(25.00), 5).await;

        // Usuário sem carrinho: o caminho mais longo, que também cria o carrinho.
        let cart = service
            .add_product_to_cart(user_id, product_id, 2)
            .await
            .unwrap();
        assert_eq!(cart.cart.total, dec!(50.00));
        assert_eq!(cart.items.len(), 1);
    }

    #[sqlx::test]
    async fn merging_lines_revalidates_merged_quantity_against_stock(pool: PgPool) {
        let service = service(&pool);
        let user_id = seed_user(&pool).await;
        let product_id = seed_product(&pool, dec!(25.00), 5).await;

        service
            .add_product_to_cart(user_id, product_id, 3)
            .await
            .unwrap();

        // 3 + 3 > 5: a mescla não pode passar do estoque.
        let err = service
            .add_product_to_cart(user_id, product_id, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let cart = service.get_or_create_active_cart(user_id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].item.quantity, 3);
        assert_eq!(cart.cart.total, dec!(75.00));
    }
}
