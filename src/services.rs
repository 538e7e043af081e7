pub mod cart_service;
pub use cart_service::CartService;
pub mod order_service;
pub use order_service::OrderService;
pub mod product_service;
pub use product_service::ProductService;
pub mod questionnaire_service;
pub use questionnaire_service::QuestionnaireService;
pub mod user_service;
pub use user_service::UserService;
