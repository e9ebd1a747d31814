use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepoError;
use crate::domain::order::{Order, OrderData};

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn create_order(
        &self,
        order: OrderData,
        order_date: DateTime<Utc>,
    ) -> Result<Order, RepoError>;
    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError>;
    async fn list_orders(&self) -> Result<Vec<Order>, RepoError>;
    /// Replaces `user_id`, `product_id` and `status`; `order_date` is kept.
    async fn update_order(&self, id: i64, order: OrderData) -> Result<Option<Order>, RepoError>;
    async fn delete_order(&self, id: i64) -> Result<bool, RepoError>;
}
