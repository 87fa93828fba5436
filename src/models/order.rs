use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::cart::CartItem;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub reference: Uuid,
    pub user_id: i64,
    pub status: String,
    pub total_cents: i64,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbOrder {
    pub id: i64,
    pub reference: String,
    pub user_id: i64,
    pub status: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn from_parts(row: DbOrder, items: Vec<CartItem>) -> Result<Self, AppError> {
        let reference = Uuid::parse_str(&row.reference)
            .map_err(|err| AppError::internal(format!("order {} has a malformed reference: {err}", row.id)))?;

        Ok(Self {
            id: row.id,
            reference,
            user_id: row.user_id,
            status: row.status,
            total_cents: row.total_cents,
            items,
            created_at: row.created_at,
        })
    }
}
