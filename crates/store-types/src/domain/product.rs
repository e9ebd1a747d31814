use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationResult, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductData {
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            price: Some(price),
        }
    }

    pub fn validate(self) -> ValidationResult<ProductData> {
        Ok(ProductData {
            name: validation::required_text("name", self.name, MAX_NAME_LEN)?,
            description: validation::required_text(
                "description",
                self.description,
                MAX_DESCRIPTION_LEN,
            )?,
            price: validation::finite_number("price", self.price)?,
        })
    }
}

impl ProductData {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}
