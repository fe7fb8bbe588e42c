use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::sale::Sale;

pub const MISSING_PARAMETER_MESSAGE: &str = "You have a missing parameter!";

#[derive(Debug, Default, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(alias = "prod_id")]
    pub product_id: Option<i64>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleOrder {
    pub product_id: i64,
    pub quantity: i32,
}

impl CreateSaleRequest {
    pub fn validate(self) -> Result<SaleOrder, AppError> {
        let (Some(product_id), Some(quantity)) = (self.product_id, self.quantity) else {
            return Err(AppError::validation(MISSING_PARAMETER_MESSAGE));
        };
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be greater than 0"));
        }
        Ok(SaleOrder { product_id, quantity })
    }
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
    pub total: f64,
    pub created_at: Option<String>,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            user_id: sale.user_id,
            product_id: sale.product_id,
            quantity: sale.quantity,
            unit_price: sale.unit_price,
            total: sale.quantity as f64 * sale.unit_price,
            created_at: sale.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
