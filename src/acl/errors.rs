use crate::db::StoreError;
use crate::models::acl::MaintenanceRecord;

/// Why an access check did not allow a request. Logged server-side; clients
/// only ever see the fixed message the enclosing [`super::AccessDecision`] maps to.
#[derive(thiserror::Error, Debug)]
pub enum AclError {
    #[error("acl rule misconfigured: {0}")]
    Configuration(&'static str),
    #[error("store unreachable: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("store query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("no principal attached to request")]
    MissingPrincipal,
    #[error("role {role_id} has no grant for {resource}:{mode}")]
    NoGrant {
        role_id: i64,
        resource: String,
        mode: String,
    },
    #[error("grant for role {role_id} on {resource}:{mode} is disabled")]
    GrantRevoked {
        role_id: i64,
        resource: String,
        mode: String,
    },
    #[error("resource {0} is disabled")]
    ResourceUnavailable(String),
    #[error("service is under maintenance")]
    MaintenanceActive(MaintenanceRecord),
}

impl From<StoreError> for AclError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Connection(err) => Self::Connection(err),
            StoreError::Query(err) => Self::Query(err),
        }
    }
}
