use chrono::Utc;
use std::sync::Arc;

use super::conflict;
use crate::errors::AppError;
use store_types::domain::order::{Order, OrderData, OrderInput};
use store_types::ports::{OrderRepository, ProductRepository, UserRepository};
use store_types::validation::ValidationError;

/// Orders reference a user and a product, so the service needs all three
/// ports to resolve them.
pub struct OrderService<R>
where
    R: OrderRepository + UserRepository + ProductRepository,
{
    repo: Arc<R>,
}

impl<R> OrderService<R>
where
    R: OrderRepository + UserRepository + ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Explicit lookups of the referenced user and product.
    async fn check_references(&self, order: &OrderData) -> Result<(), AppError> {
        if self.repo.get_user(order.user_id).await?.is_none() {
            return Err(ValidationError::UnknownReference {
                entity: "user",
                id: order.user_id,
            }
            .into());
        }
        if self.repo.get_product(order.product_id).await?.is_none() {
            return Err(ValidationError::UnknownReference {
                entity: "product",
                id: order.product_id,
            }
            .into());
        }
        Ok(())
    }

    pub async fn create_order(&self, input: OrderInput) -> Result<Order, AppError> {
        let data = input.validate()?;
        self.check_references(&data).await?;
        let order = self
            .repo
            .create_order(data, Utc::now())
            .await
            .map_err(|e| conflict(e, || "order references a missing user or product".into()))?;
        tracing::info!(
            order_id = order.id,
            user_id = order.user_id,
            product_id = order.product_id,
            "order created"
        );
        Ok(order)
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, AppError> {
        match self.repo.get_order(id).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_orders().await?)
    }

    pub async fn update_order(&self, id: i64, input: OrderInput) -> Result<Order, AppError> {
        let data = input.validate()?;
        if self.repo.get_order(id).await?.is_none() {
            return Err(AppError::NotFound(format!("order {}", id)));
        }
        self.check_references(&data).await?;
        match self
            .repo
            .update_order(id, data)
            .await
            .map_err(|e| conflict(e, || "order references a missing user or product".into()))?
        {
            Some(o) => {
                tracing::info!(order_id = id, status = %o.status, "order updated");
                Ok(o)
            }
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete_order(id).await? {
            tracing::info!(order_id = id, "order deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("order {}", id)))
        }
    }
}
