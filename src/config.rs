// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{CartRepository, OrderRepository, ProductRepository, QuestionnaireRepository, UserRepository},
    services::{CartService, OrderService, ProductService, QuestionnaireService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub product_service: ProductService,
    pub cart_service: CartService,
    pub order_service: OrderService,
    pub user_service: UserService,
    pub questionnaire_service: QuestionnaireService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let product_repo = ProductRepository::new(db_pool.clone());
        let cart_repo = CartRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let questionnaire_repo = QuestionnaireRepository::new(db_pool.clone());

        let product_service = ProductService::new(product_repo.clone(), db_pool.clone());
        let cart_service = CartService::new(
            cart_repo.clone(),
            product_repo.clone(),
            db_pool.clone(),
        );
        let order_service = OrderService::new(
            order_repo,
            product_repo,
            user_repo.clone(),
            cart_service.clone(),
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo, db_pool.clone());
        let questionnaire_service = QuestionnaireService::new(questionnaire_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            product_service,
            cart_service,
            order_service,
            user_service,
            questionnaire_service,
        })
    }
}
