pub mod cart_repo;
pub use cart_repo::CartRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod questionnaire_repo;
pub use questionnaire_repo::QuestionnaireRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
