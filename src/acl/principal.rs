use crate::jwt::Claims;
use crate::models::user::SessionUser;

/// The caller's role as seen by the access checks. Fixed for the life of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub role_id: i64,
    pub role_code: String,
}

impl Principal {
    pub fn new(role_id: i64, role_code: impl Into<String>) -> Self {
        Self {
            role_id,
            role_code: role_code.into(),
        }
    }
}

/// Pre-authentication source: the token decoded by `jwt::require_token`.
impl From<&Claims> for Principal {
    fn from(claims: &Claims) -> Self {
        Self::new(claims.role_id, claims.role_code.as_str())
    }
}

/// Post-authentication source: the session built after credentials check out.
impl From<&SessionUser> for Principal {
    fn from(user: &SessionUser) -> Self {
        Self::new(user.role_id, user.role_code.as_str())
    }
}
