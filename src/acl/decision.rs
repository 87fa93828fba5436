use crate::errors::AppError;
use crate::messages;

use super::errors::AclError;

/// Outcome of one access check. Built per request and never cached.
#[derive(Debug)]
pub enum AccessDecision {
    Allowed,
    /// 401
    Denied(AclError),
    /// 503
    ServiceUnavailable(AclError),
    /// 500
    ServerError(AclError),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    /// Emits the decision to the log at a level matching its severity.
    pub(crate) fn trace(&self, role_code: Option<&str>, resource: &str, mode: &str) {
        let role_code = role_code.unwrap_or("-");
        match self {
            AccessDecision::Allowed => {
                tracing::debug!(role_code, resource, mode, "access allowed");
            }
            AccessDecision::Denied(AclError::Query(err)) => {
                tracing::error!(role_code, resource, mode, error = %err, "permission lookup failed");
            }
            AccessDecision::Denied(reason) => {
                tracing::warn!(role_code, resource, mode, reason = %reason, "access denied");
            }
            AccessDecision::ServiceUnavailable(AclError::MaintenanceActive(record)) => {
                tracing::warn!(role_code, resource, mode, maintenance = ?record, "rejected during maintenance");
            }
            AccessDecision::ServiceUnavailable(reason @ (AclError::Connection(_) | AclError::Query(_))) => {
                tracing::error!(role_code, resource, mode, reason = %reason, "store failure during access check");
            }
            AccessDecision::ServiceUnavailable(reason) => {
                tracing::warn!(role_code, resource, mode, reason = %reason, "resource unavailable");
            }
            AccessDecision::ServerError(reason) => {
                tracing::error!(role_code, resource, mode, reason = %reason, "access check misconfigured");
            }
        }
    }

    /// Maps the decision onto the fixed client-facing message set.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            AccessDecision::Allowed => Ok(()),
            AccessDecision::Denied(_) => Err(AppError::unauthorized(messages::UNAUTHORIZED_REQUEST)),
            AccessDecision::ServiceUnavailable(AclError::Connection(_)) => {
                Err(AppError::service_unavailable(messages::DATABASE_CONN_ERROR))
            }
            AccessDecision::ServiceUnavailable(AclError::MaintenanceActive(_)) => {
                Err(AppError::service_unavailable(messages::SERVER_MAINTENANCE))
            }
            AccessDecision::ServiceUnavailable(_) => {
                Err(AppError::service_unavailable(messages::SERVICE_UNAVAILABLE))
            }
            AccessDecision::ServerError(reason) => Err(AppError::configuration(reason.to_string())),
        }
    }
}
