//! Maintenance gate.
//!
//! Reads the singleton maintenance row. A missing row means the service is up.

use crate::db::{AclConnection, StoreError};
use crate::models::acl::MaintenanceRecord;

pub const MAINTENANCE_QUERY: &str = "SELECT id, is_down, updated_at FROM maintenance ORDER BY id LIMIT 1";

#[derive(Debug)]
pub enum MaintenanceState {
    Up,
    /// Carries the record for diagnostics; it is never sent to the client.
    Down(MaintenanceRecord),
}

pub async fn check_maintenance<C>(conn: &mut C) -> Result<MaintenanceState, StoreError>
where
    C: AclConnection,
{
    let rows = conn.maintenance_rows().await?;

    Ok(match rows.into_iter().next() {
        Some(record) if record.is_down => MaintenanceState::Down(record),
        _ => MaintenanceState::Up,
    })
}
