use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::acl::eq_ignore_case;

// =============================================================================
// PERMISSION (joined view)
// =============================================================================

/// One row of the permission ▷ resource ▷ role join consulted by the resolver.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PermissionRecord {
    pub resource_id: i64,
    pub resource_code: String,
    pub resource_name: String,
    pub resource_description: Option<String>,
    pub resource_disabled: bool,
    pub role_code: String,
    pub role_name: String,
    pub role_description: Option<String>,
    pub access_mode: String,
    pub access_disabled: bool,
    pub timestamp: DateTime<Utc>,
}

impl PermissionRecord {
    pub fn matches(&self, resource: &str, mode: &str) -> bool {
        eq_ignore_case(&self.resource_code, resource) && eq_ignore_case(&self.access_mode, mode)
    }
}

// =============================================================================
// MAINTENANCE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub is_down: bool,
    pub updated_at: DateTime<Utc>,
}
