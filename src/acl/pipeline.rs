use crate::db::ConnectionProvider;

use super::decision::AccessDecision;
use super::errors::AclError;
use super::maintenance::{check_maintenance, MaintenanceState};
use super::principal::Principal;
use super::resolver;
use super::{AclRule, PrivilegedRoles};

/// Everything one access check needs, captured up front for the request.
#[derive(Debug, Clone)]
pub struct AccessCheck<'a> {
    pub principal: &'a Principal,
    pub rule: AclRule,
}

impl<'a> AccessCheck<'a> {
    pub fn new(principal: &'a Principal, rule: AclRule) -> Self {
        Self { principal, rule }
    }
}

/// Runs the full pipeline: rule validation, privileged bypass, maintenance gate
/// (unless the rule skips it), then the permission resolver.
pub async fn authorize<P>(provider: &P, privileged: &PrivilegedRoles, check: &AccessCheck<'_>) -> AccessDecision
where
    P: ConnectionProvider,
{
    let decision = evaluate(provider, privileged, check).await;
    decision.trace(Some(&check.principal.role_code), check.rule.resource, check.rule.mode);
    decision
}

async fn evaluate<P>(provider: &P, privileged: &PrivilegedRoles, check: &AccessCheck<'_>) -> AccessDecision
where
    P: ConnectionProvider,
{
    let AccessCheck { principal, rule } = check;

    if let Err(err) = rule.validate() {
        return AccessDecision::ServerError(err);
    }

    if privileged.contains(&principal.role_code) {
        tracing::debug!(role_code = %principal.role_code, "privileged role bypass");
        return AccessDecision::Allowed;
    }

    let conn = match provider.acquire().await {
        Ok(conn) => conn,
        Err(err) => return AccessDecision::ServiceUnavailable(err.into()),
    };

    let conn = if rule.skip_maintenance_check {
        conn
    } else {
        match maintenance_stage(provider, conn).await {
            Ok(conn) => conn,
            Err(decision) => return decision,
        }
    };

    resolver::resolve(provider, conn, principal.role_id, rule.resource, rule.mode).await
}

/// Maintenance-only check for routes that carry no permission requirement.
pub async fn ensure_service_up<P>(provider: &P) -> AccessDecision
where
    P: ConnectionProvider,
{
    let decision = match provider.acquire().await {
        Ok(conn) => match maintenance_stage(provider, conn).await {
            Ok(conn) => {
                provider.release(conn);
                AccessDecision::Allowed
            }
            Err(decision) => decision,
        },
        Err(err) => AccessDecision::ServiceUnavailable(err.into()),
    };

    decision.trace(None, "-", "-");
    decision
}

/// Hands the connection back to the caller only when the service is up;
/// otherwise releases it and returns the terminal decision.
async fn maintenance_stage<P>(provider: &P, mut conn: P::Connection) -> Result<P::Connection, AccessDecision>
where
    P: ConnectionProvider,
{
    match check_maintenance(&mut conn).await {
        Ok(MaintenanceState::Up) => Ok(conn),
        Ok(MaintenanceState::Down(record)) => {
            provider.release(conn);
            Err(AccessDecision::ServiceUnavailable(AclError::MaintenanceActive(record)))
        }
        Err(err) => {
            provider.release(conn);
            Err(AccessDecision::ServiceUnavailable(err.into()))
        }
    }
}
