//! Request guards wired into the router.
//!
//! ```rust,ignore
//! Router::new().route(
//!     "/cart",
//!     post(cart::add)
//!         .route_layer(middleware::from_fn_with_state(acl::guard(&state, AclRule::new("cart", "w")), acl::acl))
//!         .route_layer(middleware::from_fn_with_state(state.clone(), jwt::require_token)),
//! );
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::app::AppState;
use crate::errors::AppResult;
use crate::jwt::Claims;
use crate::messages;
use crate::models::user::Session;
use crate::response::ApiResponse;

use super::decision::AccessDecision;
use super::errors::AclError;
use super::pipeline::{authorize, ensure_service_up, AccessCheck};
use super::principal::Principal;
use super::AclRule;

/// Middleware state for [`acl`]: the app state plus the route's requirement.
#[derive(Clone)]
pub struct Guard {
    state: AppState,
    rule: AclRule,
}

pub fn guard(state: &AppState, rule: AclRule) -> Guard {
    Guard {
        state: state.clone(),
        rule,
    }
}

/// Pre-authentication guard. Reads the principal from the claims attached by
/// `jwt::require_token` and advances the chain when access is allowed.
pub async fn acl(State(guard): State<Guard>, req: Request, next: Next) -> Response {
    let Guard { state, rule } = guard;
    let principal = req.extensions().get::<Claims>().map(Principal::from);

    let decision = match principal {
        Some(principal) => {
            let check = AccessCheck::new(&principal, rule);
            authorize(&state.db, &state.privileged_roles, &check).await
        }
        None => {
            let decision = AccessDecision::Denied(AclError::MissingPrincipal);
            decision.trace(None, rule.resource, rule.mode);
            decision
        }
    };

    match decision.into_result() {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

/// Post-authentication check used to finish a sign-in. Always consults the
/// maintenance flag; on success responds with the session itself.
pub async fn login_check(
    state: &AppState,
    session: Session,
    resource: &'static str,
    mode: &'static str,
) -> AppResult<Json<ApiResponse<Session>>> {
    let principal = Principal::from(&session.user);
    let check = AccessCheck::new(&principal, AclRule::new(resource, mode));

    authorize(&state.db, &state.privileged_roles, &check)
        .await
        .into_result()?;

    Ok(Json(ApiResponse::ok(messages::USER_SIGNIN_SUCCESS, session)))
}

/// Rejects every request while the service is flagged down, regardless of caller.
pub async fn is_maintenance(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match ensure_service_up(&state.db).await.into_result() {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}
