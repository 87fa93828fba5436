//! Permission resolver.
//!
//! Decision policy for a (role, resource, mode) triple, first match wins:
//! 1. lookup failed or no grant -> denied
//! 2. resource withdrawn -> service unavailable
//! 3. grant disabled -> denied
//! 4. allowed

use crate::db::{AclConnection, ConnectionProvider, StoreError};
use crate::models::acl::PermissionRecord;

use super::decision::AccessDecision;
use super::errors::AclError;

pub const PERMISSION_QUERY: &str = "\
    SELECT s.id AS resource_id, s.code AS resource_code, s.name AS resource_name, \
           s.description AS resource_description, s.deleted AS resource_disabled, \
           r.code AS role_code, r.name AS role_name, r.description AS role_description, \
           p.mode AS access_mode, p.is_disabled AS access_disabled, p.timestamp AS timestamp \
    FROM permission p \
    INNER JOIN resource s ON s.id = p.resource_id \
    INNER JOIN role r ON r.id = p.role_id \
    WHERE p.role_id = ? AND LOWER(s.code) = LOWER(?) AND LOWER(p.mode) = LOWER(?) \
    ORDER BY p.id";

/// Runs the grant lookup and gives the connection back before deciding.
pub async fn resolve<P>(
    provider: &P,
    mut conn: P::Connection,
    role_id: i64,
    resource: &str,
    mode: &str,
) -> AccessDecision
where
    P: ConnectionProvider,
{
    let rows = conn.permission_rows(role_id, resource, mode).await;
    provider.release(conn);

    decide(rows, role_id, resource, mode)
}

pub fn decide(
    rows: Result<Vec<PermissionRecord>, StoreError>,
    role_id: i64,
    resource: &str,
    mode: &str,
) -> AccessDecision {
    let rows = match rows {
        Ok(rows) => rows,
        Err(err) => return AccessDecision::Denied(err.into()),
    };

    let Some(record) = rows.into_iter().find(|row| row.matches(resource, mode)) else {
        return AccessDecision::Denied(AclError::NoGrant {
            role_id,
            resource: resource.to_string(),
            mode: mode.to_string(),
        });
    };

    if record.resource_disabled {
        return AccessDecision::ServiceUnavailable(AclError::ResourceUnavailable(record.resource_code));
    }

    if record.access_disabled {
        return AccessDecision::Denied(AclError::GrantRevoked {
            role_id,
            resource: record.resource_code,
            mode: record.access_mode,
        });
    }

    AccessDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::testing::{grant, FakeProvider, StoreFixture};

    const CUSTOMER: i64 = 3;

    #[test]
    fn store_failure_is_denied() {
        let rows = Err(StoreError::Query(sqlx::Error::Protocol("boom".into())));
        let decision = decide(rows, CUSTOMER, "cart", "w");
        assert!(matches!(decision, AccessDecision::Denied(AclError::Query(_))));
    }

    #[test]
    fn no_rows_is_denied() {
        let decision = decide(Ok(Vec::new()), CUSTOMER, "cart", "w");
        assert!(matches!(decision, AccessDecision::Denied(AclError::NoGrant { .. })));
    }

    #[test]
    fn deleted_resource_wins_over_active_grant() {
        let (_, mut row) = grant(CUSTOMER, "cart", "w");
        row.resource_disabled = true;

        let decision = decide(Ok(vec![row]), CUSTOMER, "cart", "w");
        assert!(matches!(
            decision,
            AccessDecision::ServiceUnavailable(AclError::ResourceUnavailable(ref code)) if code == "cart"
        ));
    }

    #[test]
    fn deleted_resource_wins_over_disabled_grant() {
        let (_, mut row) = grant(CUSTOMER, "cart", "w");
        row.resource_disabled = true;
        row.access_disabled = true;

        let decision = decide(Ok(vec![row]), CUSTOMER, "cart", "w");
        assert!(matches!(decision, AccessDecision::ServiceUnavailable(_)));
    }

    #[test]
    fn disabled_grant_is_denied() {
        let (_, mut row) = grant(CUSTOMER, "cart", "w");
        row.access_disabled = true;

        let decision = decide(Ok(vec![row]), CUSTOMER, "cart", "w");
        assert!(matches!(decision, AccessDecision::Denied(AclError::GrantRevoked { .. })));
    }

    #[test]
    fn first_matching_row_is_consulted() {
        let (_, first) = grant(CUSTOMER, "cart", "w");
        let (_, mut second) = grant(CUSTOMER, "cart", "w");
        second.access_disabled = true;

        assert!(decide(Ok(vec![first.clone(), second.clone()]), CUSTOMER, "cart", "w").is_allowed());
        assert!(!decide(Ok(vec![second, first]), CUSTOMER, "cart", "w").is_allowed());
    }

    #[test]
    fn codes_and_modes_match_case_insensitively() {
        let (_, row) = grant(CUSTOMER, "Cart", "W");
        assert!(decide(Ok(vec![row]), CUSTOMER, "CART", "w").is_allowed());
    }

    #[tokio::test]
    async fn resolve_releases_connection_on_every_outcome() {
        let fixtures = [
            StoreFixture::default().with_grant(grant(CUSTOMER, "cart", "w")),
            StoreFixture::default(),
            StoreFixture::default().failing_permissions(),
        ];

        for fixture in fixtures {
            let provider = FakeProvider::new(fixture);
            let conn = provider.acquire().await.unwrap();
            let _ = resolve(&provider, conn, CUSTOMER, "cart", "w").await;

            let calls = provider.calls();
            assert_eq!(calls.acquired, 1);
            assert_eq!(calls.released, 1);
            assert_eq!(calls.permission_queries, 1);
        }
    }
}
