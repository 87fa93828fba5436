use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::messages;
use crate::models::package::{Package, PackageCreateRequest};
use crate::response::ApiResponse;

const PACKAGE_COLUMNS: &str =
    "id, airline_id, name, origin, destination, departs_at, price_cents, seats, created_at";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PackageFilter {
    /// Only packages sold for this airline.
    pub airline_id: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/packages",
    tag = "Packages",
    security(("bearerAuth" = [])),
    request_body = PackageCreateRequest,
    responses(
        (status = 201, description = "Package created", body = Package),
        (status = 401, description = "Unauthorized request"),
        (status = 404, description = "Airline not found")
    )
)]
pub async fn create_package(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<PackageCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Package>>)> {
    let origin = payload.origin.trim().to_ascii_uppercase();
    let destination = payload.destination.trim().to_ascii_uppercase();

    if payload.name.trim().is_empty() || origin.is_empty() || destination.is_empty() {
        return Err(AppError::bad_request("name, origin and destination are required"));
    }
    if origin == destination {
        return Err(AppError::bad_request("origin and destination must differ"));
    }
    if payload.price_cents < 0 || payload.seats < 0 {
        return Err(AppError::bad_request("price_cents and seats cannot be negative"));
    }

    let airline_exists: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM airlines WHERE id = ?")
        .bind(payload.airline_id)
        .fetch_one(state.db.pool())
        .await?;
    if airline_exists == 0 {
        return Err(AppError::not_found(messages::AIRLINE_NOT_FOUND));
    }

    let package_id = sqlx::query(
        "INSERT INTO packages (airline_id, name, origin, destination, departs_at, price_cents, seats) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(payload.airline_id)
    .bind(payload.name.trim())
    .bind(&origin)
    .bind(&destination)
    .bind(payload.departs_at)
    .bind(payload.price_cents)
    .bind(payload.seats)
    .execute(state.db.pool())
    .await?
    .last_insert_rowid();

    let package = sqlx::query_as::<_, Package>(&format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = ?"))
        .bind(package_id)
        .fetch_one(state.db.pool())
        .await?;

    tracing::info!(package_id = package.id, airline_id = package.airline_id, "package created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(messages::PACKAGE_CREATE_SUCCESS, package))))
}

#[utoipa::path(
    get,
    path = "/packages",
    tag = "Packages",
    security(("bearerAuth" = [])),
    params(PackageFilter),
    responses(
        (status = 200, description = "Packages", body = [Package]),
        (status = 401, description = "Unauthorized request")
    )
)]
pub async fn list_packages(
    State(state): State<AppState>,
    Query(filter): Query<PackageFilter>,
) -> AppResult<Json<ApiResponse<Vec<Package>>>> {
    let packages = sqlx::query_as::<_, Package>(&format!(
        "SELECT {PACKAGE_COLUMNS} FROM packages WHERE (?1 IS NULL OR airline_id = ?1) ORDER BY departs_at, id"
    ))
    .bind(filter.airline_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(Json(ApiResponse::ok(messages::PACKAGE_FETCH_SUCCESS, packages)))
}
