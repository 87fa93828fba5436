use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::Server;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::server::index,
        routes::health::health,
        routes::users::signup,
        routes::users::signin,
        routes::users::signout,
        routes::airlines::create_airline,
        routes::airlines::list_airlines,
        routes::packages::create_package,
        routes::packages::list_packages,
        routes::cart::add_to_cart,
        routes::cart::fetch_cart,
        routes::cart::remove_from_cart,
        routes::checkout::checkout
    ),
    components(
        schemas(
            routes::server::ServiceInfo,
            routes::health::HealthResponse,
            models::user::User,
            models::user::SignupRequest,
            models::user::SigninRequest,
            models::user::Session,
            models::user::SessionUser,
            models::airline::Airline,
            models::airline::AirlineCreateRequest,
            models::package::Package,
            models::package::PackageCreateRequest,
            models::cart::Cart,
            models::cart::CartItem,
            models::cart::CartAddRequest,
            models::order::Order
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Server", description = "Service information and health"),
        (name = "Users", description = "Sign-up, sign-in and sign-out"),
        (name = "Airlines", description = "Airline catalogue"),
        (name = "Packages", description = "Travel packages"),
        (name = "Cart", description = "Caller's shopping cart"),
        (name = "Checkout", description = "Order placement")
    )
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by guarded operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn build_openapi(port: u16) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(format!("http://localhost:{port}"))]);
    doc
}

/// Swagger UI at `/docs`, backed by the document served at `/api-docs/openapi.json`.
pub fn swagger_routes<S>(doc: utoipa::openapi::OpenApi) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", doc).into()
}
