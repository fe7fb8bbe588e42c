// src/dtos/product.rs
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::product::{NewProduct, Product};

/// Body of `POST /products` and `PUT /products/{id}`. Every field is required;
/// they are optional here so a missing one gets its own message.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub minimum_allowed: Option<i32>,
}

impl ProductRequest {
    pub fn validate(self) -> Result<NewProduct, AppError> {
        let name = self.name.ok_or_else(|| AppError::validation("Missing required field: name"))?;
        let price = self.price.ok_or_else(|| AppError::validation("Missing required field: price"))?;
        let quantity = self.quantity.ok_or_else(|| AppError::validation("Missing required field: quantity"))?;
        let minimum_allowed = self
            .minimum_allowed
            .ok_or_else(|| AppError::validation("Missing required field: minimum_allowed"))?;

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Product name cannot be empty"));
        }
        // Integer keys in /products/{key} are ids, so such a name could never be looked up.
        if name.parse::<i64>().is_ok() {
            return Err(AppError::validation("Product name cannot be a number"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(AppError::validation("Price must be a positive number"));
        }
        if quantity < 0 {
            return Err(AppError::validation("Quantity cannot be negative"));
        }
        if minimum_allowed < 0 {
            return Err(AppError::validation("Minimum allowed cannot be negative"));
        }

        Ok(NewProduct { name, price, quantity, minimum_allowed })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub minimum_allowed: i32,
    pub created_at: Option<String>,
}

// Convert from Model to Response DTO
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            minimum_allowed: product.minimum_allowed,
            created_at: product.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
