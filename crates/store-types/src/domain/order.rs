use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationResult, MAX_STATUS_LEN};

pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Validated order columns. `order_date` is not part of the payload: it is
/// stamped when the order is created and kept across updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderData {
    pub user_id: i64,
    pub product_id: i64,
    pub status: String,
}

impl OrderInput {
    pub fn new(user_id: i64, product_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            product_id: Some(product_id),
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn validate(self) -> ValidationResult<OrderData> {
        let status = match self.status {
            None => DEFAULT_STATUS.to_string(),
            status => validation::required_text("status", status, MAX_STATUS_LEN)?,
        };
        Ok(OrderData {
            user_id: validation::positive_id("user_id", self.user_id)?,
            product_id: validation::positive_id("product_id", self.product_id)?,
            status,
        })
    }
}

impl OrderData {
    pub fn into_order(self, id: i64, order_date: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            product_id: self.product_id,
            order_date,
            status: self.status,
        }
    }
}
