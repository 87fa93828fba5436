use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::messages;
use crate::models::airline::{Airline, AirlineCreateRequest};
use crate::response::ApiResponse;

#[utoipa::path(
    post,
    path = "/airlines",
    tag = "Airlines",
    security(("bearerAuth" = [])),
    request_body = AirlineCreateRequest,
    responses(
        (status = 201, description = "Airline created", body = Airline),
        (status = 401, description = "Unauthorized request"),
        (status = 409, description = "Airline code already registered")
    )
)]
pub async fn create_airline(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AirlineCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Airline>>)> {
    let code = payload.code.trim().to_ascii_uppercase();
    let name = payload.name.trim();
    if code.is_empty() || name.is_empty() {
        return Err(AppError::bad_request("code and name are required"));
    }

    let taken: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM airlines WHERE code = ?")
        .bind(&code)
        .fetch_one(state.db.pool())
        .await?;
    if taken > 0 {
        return Err(AppError::conflict(messages::AIRLINE_CODE_TAKEN));
    }

    let airline_id = sqlx::query("INSERT INTO airlines (code, name, country) VALUES (?, ?, ?)")
        .bind(&code)
        .bind(name)
        .bind(payload.country.as_deref().map(str::trim).filter(|c| !c.is_empty()))
        .execute(state.db.pool())
        .await?
        .last_insert_rowid();

    let airline = sqlx::query_as::<_, Airline>("SELECT id, code, name, country, created_at FROM airlines WHERE id = ?")
        .bind(airline_id)
        .fetch_one(state.db.pool())
        .await?;

    tracing::info!(airline_id = airline.id, code = %airline.code, "airline created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(messages::AIRLINE_CREATE_SUCCESS, airline))))
}

#[utoipa::path(
    get,
    path = "/airlines",
    tag = "Airlines",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Airlines", body = [Airline]),
        (status = 401, description = "Unauthorized request")
    )
)]
pub async fn list_airlines(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Airline>>>> {
    let airlines = sqlx::query_as::<_, Airline>("SELECT id, code, name, country, created_at FROM airlines ORDER BY code")
        .fetch_all(state.db.pool())
        .await?;

    Ok(Json(ApiResponse::ok(messages::AIRLINE_FETCH_SUCCESS, airlines)))
}
