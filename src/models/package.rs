use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A bookable travel package sold on behalf of an airline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Package {
    pub id: i64,
    pub airline_id: i64,
    pub name: String,
    #[schema(example = "MNL")]
    pub origin: String,
    #[schema(example = "NRT")]
    pub destination: String,
    pub departs_at: DateTime<Utc>,
    /// Price in minor currency units.
    pub price_cents: i64,
    pub seats: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PackageCreateRequest {
    pub airline_id: i64,
    #[schema(example = "Tokyo Spring Getaway")]
    pub name: String,
    #[schema(example = "MNL")]
    pub origin: String,
    #[schema(example = "NRT")]
    pub destination: String,
    pub departs_at: DateTime<Utc>,
    #[schema(example = 45000)]
    pub price_cents: i64,
    #[schema(example = 120)]
    pub seats: i64,
}
