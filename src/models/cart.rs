use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::messages;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartItem {
    pub package_id: i64,
    pub package_name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

impl CartItem {
    /// `None` when the line total does not fit in an `i64`.
    pub fn subtotal_cents(&self) -> Option<i64> {
        self.price_cents.checked_mul(self.quantity)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_cents: i64,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Result<Self, AppError> {
        let total_cents = items
            .iter()
            .try_fold(0i64, |total, item| item.subtotal_cents().and_then(|sub| total.checked_add(sub)))
            .ok_or_else(|| AppError::bad_request(messages::CART_TOTAL_TOO_LARGE))?;

        Ok(Self { items, total_cents })
    }
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartAddRequest {
    pub package_id: i64,
    #[serde(default = "default_quantity")]
    #[schema(example = 1)]
    pub quantity: i64,
}
