pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    /// A uniqueness or foreign-key rule of the store rejected the write.
    #[error("constraint violated: {0}")]
    Conflict(String),

    #[error("db error: {0}")]
    DbError(String),
}

/// Everything the HTTP surface needs from one storage backend.
pub trait StoreRepository: UserRepository + ProductRepository + OrderRepository {}

impl<T> StoreRepository for T where T: UserRepository + ProductRepository + OrderRepository {}
