use axum::extract::{Path, State};
use axum::Json;
use sqlx::{Executor, Sqlite};

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::jwt::AuthUser;
use crate::messages;
use crate::models::cart::{Cart, CartAddRequest, CartItem};
use crate::response::ApiResponse;

/// Current cart lines for `user_id`, priced at today's package price.
pub(crate) async fn cart_items<'e, E>(executor: E, user_id: i64) -> Result<Vec<CartItem>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, CartItem>(
        "SELECT c.package_id, p.name AS package_name, p.price_cents, c.quantity \
         FROM cart_items c INNER JOIN packages p ON p.id = c.package_id \
         WHERE c.user_id = ? ORDER BY c.added_at, c.package_id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

#[utoipa::path(
    post,
    path = "/cart",
    tag = "Cart",
    security(("bearerAuth" = [])),
    request_body = CartAddRequest,
    responses(
        (status = 200, description = "Package added; returns the cart", body = Cart),
        (status = 401, description = "Unauthorized request"),
        (status = 404, description = "Package not found"),
        (status = 409, description = "Requested quantity exceeds remaining seats")
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<CartAddRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    if payload.quantity < 1 {
        return Err(AppError::bad_request("quantity must be at least 1"));
    }

    let pool = state.db.pool();
    let seats: i64 = sqlx::query_scalar("SELECT seats FROM packages WHERE id = ?")
        .bind(payload.package_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found(messages::PACKAGE_NOT_FOUND))?;

    let in_cart: i64 = sqlx::query_scalar("SELECT quantity FROM cart_items WHERE user_id = ? AND package_id = ?")
        .bind(auth.user_id)
        .bind(payload.package_id)
        .fetch_optional(pool)
        .await?
        .unwrap_or(0);

    let quantity = in_cart
        .checked_add(payload.quantity)
        .filter(|quantity| *quantity <= seats)
        .ok_or_else(|| AppError::conflict(messages::CART_QUANTITY_EXCEEDS_SEATS))?;

    sqlx::query(
        "INSERT INTO cart_items (user_id, package_id, quantity) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, package_id) DO UPDATE SET quantity = excluded.quantity",
    )
    .bind(auth.user_id)
    .bind(payload.package_id)
    .bind(quantity)
    .execute(pool)
    .await?;

    let cart = Cart::new(cart_items(pool, auth.user_id).await?)?;
    Ok(Json(ApiResponse::ok(messages::CART_ADD_SUCCESS, cart)))
}

#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Caller's cart", body = Cart),
        (status = 401, description = "Unauthorized request")
    )
)]
pub async fn fetch_cart(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = Cart::new(cart_items(state.db.pool(), auth.user_id).await?)?;
    Ok(Json(ApiResponse::ok(messages::CART_FETCH_SUCCESS, cart)))
}

#[utoipa::path(
    delete,
    path = "/cart/{pkg_id}",
    tag = "Cart",
    security(("bearerAuth" = [])),
    params(("pkg_id" = i64, Path, description = "Package to drop from the cart")),
    responses(
        (status = 200, description = "Package removed; returns the cart", body = Cart),
        (status = 401, description = "Unauthorized request"),
        (status = 404, description = "Package is not in cart")
    )
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pkg_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let pool = state.db.pool();
    let removed = sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND package_id = ?")
        .bind(auth.user_id)
        .bind(pkg_id)
        .execute(pool)
        .await?
        .rows_affected();

    if removed == 0 {
        return Err(AppError::not_found(messages::CART_ITEM_NOT_FOUND));
    }

    let cart = Cart::new(cart_items(pool, auth.user_id).await?)?;
    Ok(Json(ApiResponse::ok(messages::CART_REMOVE_SUCCESS, cart)))
}
