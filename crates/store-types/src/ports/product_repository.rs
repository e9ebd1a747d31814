use async_trait::async_trait;

use super::RepoError;
use crate::domain::product::{Product, ProductData};

#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create_product(&self, product: ProductData) -> Result<Product, RepoError>;
    async fn get_product(&self, id: i64) -> Result<Option<Product>, RepoError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepoError>;
    async fn update_product(
        &self,
        id: i64,
        product: ProductData,
    ) -> Result<Option<Product>, RepoError>;
    async fn delete_product(&self, id: i64) -> Result<bool, RepoError>;
}
