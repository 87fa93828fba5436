//! Access control - maintenance gate, permission resolver and request guards
//!
//! Every protected route runs the same pipeline:
//! - privileged roles bypass the store entirely
//! - the maintenance flag is checked (unless the route opts out)
//! - the caller's role is resolved against a resource/mode grant
//!
//! Each stage returns an [`AccessDecision`]; the first non-allowed decision is
//! the terminal response. Connections are acquired once per request and given
//! back exactly once on every path.

mod decision;
mod errors;
pub mod maintenance;
mod middleware;
mod pipeline;
mod principal;
pub mod resolver;
#[cfg(test)]
pub(crate) mod testing;

pub use decision::AccessDecision;
pub use errors::AclError;
pub use middleware::{acl, guard, is_maintenance, login_check, Guard};
pub use pipeline::{authorize, ensure_service_up, AccessCheck};
pub use principal::Principal;

use std::sync::Arc;

/// Role codes that skip every access check.
pub const DEFAULT_PRIVILEGED_ROLES: [&str; 2] = ["sup_admin", "sys_admin"];

/// Case-insensitive comparison used for role codes, resource codes and modes.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Operator roles allowed through without consulting maintenance or grants.
#[derive(Debug, Clone)]
pub struct PrivilegedRoles(Arc<[String]>);

impl PrivilegedRoles {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes
            .into_iter()
            .map(Into::into)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();
        Self(codes.into())
    }

    /// Reads `ACL_PRIVILEGED_ROLES` (comma separated), falling back to
    /// [`DEFAULT_PRIVILEGED_ROLES`] when unset or blank.
    pub fn from_env() -> Self {
        match std::env::var("ACL_PRIVILEGED_ROLES") {
            Ok(value) if !value.trim().is_empty() => Self::new(value.split(',')),
            _ => Self::default(),
        }
    }

    pub fn contains(&self, role_code: &str) -> bool {
        self.0.iter().any(|code| eq_ignore_case(code, role_code))
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }
}

impl Default for PrivilegedRoles {
    fn default() -> Self {
        Self::new(DEFAULT_PRIVILEGED_ROLES)
    }
}

/// Per-route requirement: the resource code and access mode a caller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclRule {
    pub resource: &'static str,
    pub mode: &'static str,
    pub skip_maintenance_check: bool,
}

impl AclRule {
    pub const fn new(resource: &'static str, mode: &'static str) -> Self {
        Self {
            resource,
            mode,
            skip_maintenance_check: false,
        }
    }

    /// Route stays reachable while the service is flagged down.
    pub const fn skip_maintenance_check(mut self) -> Self {
        self.skip_maintenance_check = true;
        self
    }

    /// A rule without a resource or mode is a wiring mistake; it never reaches the store.
    pub fn validate(&self) -> Result<(), AclError> {
        if self.resource.trim().is_empty() {
            return Err(AclError::Configuration("resource code is empty"));
        }
        if self.mode.trim().is_empty() {
            return Err(AclError::Configuration("access mode is empty"));
        }
        Ok(())
    }
}

/// Resource codes guarded by the router.
pub mod resources {
    pub const USER_ACCOUNT: &str = "user_account";
    pub const AIRLINE: &str = "airline";
    pub const PACKAGE: &str = "package";
    pub const CART: &str = "cart";
    pub const CHECKOUT: &str = "checkout";
}

/// Access modes stored on permission rows.
pub mod modes {
    pub const READ: &str = "r";
    pub const WRITE: &str = "w";
}
