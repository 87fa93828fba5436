use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Airline {
    pub id: i64,
    #[schema(example = "PR")]
    pub code: String,
    pub name: String,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AirlineCreateRequest {
    #[schema(example = "PR")]
    pub code: String,
    #[schema(example = "Philippine Airlines")]
    pub name: String,
    #[schema(example = "Philippines")]
    pub country: Option<String>,
}
