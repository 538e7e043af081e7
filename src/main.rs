// src/main.rs

use std::net::SocketAddr;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::admin_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é aceitável aqui: sem configuração válida o servidor não sobe.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/verify", get(handlers::auth::verify));

    let products_routes = Router::new()
        .route("/", get(handlers::products::get_products))
        .route("/search", get(handlers::products::search_products))
        .route("/categories", get(handlers::products::get_categories))
        .route("/category/{category}", get(handlers::products::get_products_by_category));

    let product_routes = Router::new()
        .route("/{id}", get(handlers::products::get_product_by_id))
        .route("/{id}/related", get(handlers::products::get_related_products))
        .route("/{id}/stock", get(handlers::products::check_stock));

    let cart_routes = Router::new()
        .route("/add", post(handlers::cart::add_to_cart))
        .route(
            "/item/{cart_item_id}",
            put(handlers::cart::update_cart_item).delete(handlers::cart::remove_cart_item),
        )
        .route("/clear/{user_id}", delete(handlers::cart::clear_cart))
        .route("/{user_id}", get(handlers::cart::get_cart));

    let order_routes = Router::new()
        .route("/checkout", post(handlers::orders::checkout))
        .route("/{order_id}", get(handlers::orders::get_order_by_id))
        .route("/{order_id}/status", put(handlers::orders::update_order_status))
        .route("/{order_id}/cancel", delete(handlers::orders::cancel_order));

    let orders_routes = Router::new()
        .route("/stats", get(handlers::orders::get_order_stats_global))
        .route("/stats/{user_id}", get(handlers::orders::get_order_stats_for_user))
        .route("/{user_id}", get(handlers::orders::get_user_orders));

    let user_routes = Router::new()
        .route(
            "/{user_id}",
            get(handlers::users::get_profile).put(handlers::users::update_profile),
        )
        .route("/{user_id}/status", put(handlers::users::toggle_user_status))
        .route("/email/{correo}", get(handlers::users::find_by_email))
        .route("/document/{nro_documento}", get(handlers::users::find_by_document));

    // Rotas de admin ficam atrás do guard; o resto do cuestionario é público.
    let questionnaire_admin_routes = Router::new()
        .route("/all", get(handlers::questionnaire::get_all))
        .route(
            "/{id}",
            get(handlers::questionnaire::get_by_id).delete(handlers::questionnaire::delete),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            admin_guard,
        ));

    let questionnaire_routes = Router::new()
        .route("/submit", post(handlers::questionnaire::submit))
        .route("/user/{user_id}", get(handlers::questionnaire::get_user_questionnaires))
        .route("/user/{user_id}/count", get(handlers::questionnaire::get_count))
        .nest("/admin", questionnaire_admin_routes);

    let app = Router::new()
        .route("/", get(|| async { "🛒 Tiendita API" }))
        .nest("/auth", auth_routes)
        .nest("/products", products_routes)
        .nest("/product", product_routes)
        .nest("/cart", cart_routes)
        .nest("/order", order_routes)
        .nest("/orders", orders_routes)
        .nest("/user", user_routes)
        .nest("/questionnaire", questionnaire_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);

    // ConnectInfo é necessário para registrar o IP do cuestionario.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Erro no servidor Axum");
}
