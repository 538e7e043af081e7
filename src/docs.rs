// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::verify,

        // --- Products ---
        handlers::products::get_products,
        handlers::products::search_products,
        handlers::products::get_products_by_category,
        handlers::products::get_categories,
        handlers::products::get_product_by_id,
        handlers::products::get_related_products,
        handlers::products::check_stock,

        // --- Cart ---
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::update_cart_item,
        handlers::cart::remove_cart_item,
        handlers::cart::clear_cart,

        // --- Orders ---
        handlers::orders::checkout,
        handlers::orders::get_order_by_id,
        handlers::orders::update_order_status,
        handlers::orders::cancel_order,
        handlers::orders::get_user_orders,
        handlers::orders::get_order_stats_global,
        handlers::orders::get_order_stats_for_user,

        // --- Users ---
        handlers::users::get_profile,
        handlers::users::update_profile,
        handlers::users::find_by_email,
        handlers::users::find_by_document,
        handlers::users::toggle_user_status,

        // --- Questionnaire ---
        handlers::questionnaire::submit,
        handlers::questionnaire::get_user_questionnaires,
        handlers::questionnaire::get_count,
        handlers::questionnaire::get_all,
        handlers::questionnaire::get_by_id,
        handlers::questionnaire::delete,
    ),
    components(
        schemas(
            // --- Products ---
            models::product::Product,
            models::product::StockCheck,

            // --- Cart ---
            models::cart::CartStatus,
            models::cart::Cart,
            models::cart::CartItem,
            models::cart::CartItemWithProduct,
            models::cart::CartWithItems,

            // --- Orders ---
            models::order::PaymentMethod,
            models::order::PaymentStatus,
            models::order::OrderStatus,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderWithItems,
            models::order::OrderStat,

            // --- Users ---
            models::user::UserType,
            models::user::UserStatus,
            models::user::User,
            models::user::UserSummary,

            // --- Questionnaire ---
            models::questionnaire::Questionnaire,
            models::questionnaire::QuestionnaireReceipt,
            models::questionnaire::QuestionnaireCount,

            // --- Payloads ---
            handlers::auth::RegisterPayload,
            handlers::auth::LoginPayload,
            handlers::cart::AddToCartPayload,
            handlers::cart::UpdateCartItemPayload,
            handlers::orders::CheckoutPayload,
            handlers::orders::UpdateOrderStatusPayload,
            handlers::orders::CancelOrderPayload,
            handlers::users::UpdateUserPayload,
            handlers::users::ToggleStatusPayload,
            handlers::questionnaire::SubmitQuestionnairePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Registro, login e verificação de sessão"),
        (name = "Products", description = "Catálogo, busca e estoque"),
        (name = "Cart", description = "Carrinho ativo do usuário"),
        (name = "Orders", description = "Checkout, pedidos e estatísticas"),
        (name = "Users", description = "Perfil e administração de contas"),
        (name = "Questionnaire", description = "Questionário de preferências")
    )
)]
pub struct ApiDoc;
