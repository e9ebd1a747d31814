use std::sync::Arc;

use super::conflict;
use crate::errors::AppError;
use store_types::domain::product::{Product, ProductInput};
use store_types::ports::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, AppError> {
        let data = input.validate()?;
        let product = self.repo.create_product(data).await?;
        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        match self.repo.get_product(id).await? {
            Some(p) => Ok(p),
            None => Err(AppError::NotFound(format!("product {}", id))),
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.repo.list_products().await?)
    }

    pub async fn update_product(&self, id: i64, input: ProductInput) -> Result<Product, AppError> {
        let data = input.validate()?;
        match self.repo.update_product(id, data).await? {
            Some(p) => {
                tracing::info!(product_id = id, "product updated");
                Ok(p)
            }
            None => Err(AppError::NotFound(format!("product {}", id))),
        }
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let deleted = self.repo.delete_product(id).await.map_err(|e| {
            conflict(e, || format!("product {id} is referenced by existing orders"))
        })?;
        if deleted {
            tracing::info!(product_id = id, "product deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("product {}", id)))
        }
    }
}
