use std::sync::Arc;

use axum::http::Method;
use axum::middleware;
use axum::routing::{delete, get, post, MethodRouter};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::acl::{self, modes, resources, AclRule, PrivilegedRoles};
use crate::db::Database;
use crate::errors::AppError;
use crate::jwt::{self, JwtConfig};
use crate::routes::{airlines, cart, checkout, health, packages, server, users};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub privileged_roles: PrivilegedRoles,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig, privileged_roles: PrivilegedRoles) -> Self {
        Self {
            db: Database::new(pool),
            jwt: Arc::new(jwt),
            privileged_roles,
        }
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let privileged_roles = PrivilegedRoles::from_env();
    tracing::info!(roles = ?privileged_roles.codes(), "privileged roles loaded");

    Ok(router(AppState::new(pool, jwt_config, privileged_roles)))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(server::index))
        .route("/api/health", get(health::health))
        .route(
            "/users/signup",
            post(users::signup).route_layer(middleware::from_fn_with_state(state.clone(), acl::is_maintenance)),
        )
        .route("/users/signin", post(users::signin))
        .route("/users/signout", authenticated(&state, post(users::signout)))
        .route(
            "/airlines",
            guarded(&state, AclRule::new(resources::AIRLINE, modes::WRITE), post(airlines::create_airline))
                .merge(guarded(&state, AclRule::new(resources::AIRLINE, modes::READ), get(airlines::list_airlines))),
        )
        .route(
            "/packages",
            guarded(&state, AclRule::new(resources::PACKAGE, modes::WRITE), post(packages::create_package))
                .merge(guarded(&state, AclRule::new(resources::PACKAGE, modes::READ), get(packages::list_packages))),
        )
        .route(
            "/cart",
            guarded(&state, AclRule::new(resources::CART, modes::WRITE), post(cart::add_to_cart))
                .merge(guarded(&state, AclRule::new(resources::CART, modes::READ), get(cart::fetch_cart))),
        )
        .route(
            "/cart/:pkg_id",
            guarded(&state, AclRule::new(resources::CART, modes::WRITE), delete(cart::remove_from_cart)),
        )
        .route(
            "/checkout",
            guarded(&state, AclRule::new(resources::CHECKOUT, modes::WRITE), post(checkout::checkout)),
        )
        .fallback(server::not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bearer token required; no permission lookup.
fn authenticated(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), jwt::require_token))
}

/// Bearer token, then the access-control pipeline for `rule`. The last
/// `route_layer` runs first.
fn guarded(state: &AppState, rule: AclRule, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    let route = route.route_layer(middleware::from_fn_with_state(acl::guard(state, rule), acl::acl));
    authenticated(state, route)
}
