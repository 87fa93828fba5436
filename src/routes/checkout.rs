use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::messages;
use crate::models::cart::Cart;
use crate::models::order::{DbOrder, Order};
use crate::response::ApiResponse;

use super::cart::cart_items;

/// Turns the caller's cart into a placed order in one transaction: seats are
/// taken, the order and its lines are written and the cart is emptied.
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "Checkout",
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Cart is empty"),
        (status = 401, description = "Unauthorized request"),
        (status = 409, description = "Not enough seats left on a package")
    )
)]
pub async fn checkout(State(state): State<AppState>, auth: AuthUser) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let mut tx = state.db.pool().begin().await?;

    let cart = Cart::new(cart_items(&mut *tx, auth.user_id).await?)?;
    if cart.items.is_empty() {
        return Err(AppError::bad_request(messages::CART_EMPTY));
    }

    for item in &cart.items {
        let taken = sqlx::query("UPDATE packages SET seats = seats - ? WHERE id = ? AND seats >= ?")
            .bind(item.quantity)
            .bind(item.package_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if taken == 0 {
            tracing::warn!(package_id = item.package_id, quantity = item.quantity, "checkout exceeds remaining seats");
            return Err(AppError::conflict(format!(
                "{}: {}",
                messages::CHECKOUT_SEATS_UNAVAILABLE,
                item.package_name
            )));
        }
    }

    let order_id = sqlx::query("INSERT INTO orders (reference, user_id, total_cents) VALUES (?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(auth.user_id)
        .bind(cart.total_cents)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    let db_order = sqlx::query_as::<_, DbOrder>(
        "SELECT id, reference, user_id, status, total_cents, created_at FROM orders WHERE id = ?",
    )
    .bind(order_id)
    .fetch_one(&mut *tx)
    .await?;

    for item in &cart.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, package_id, package_name, price_cents, quantity) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(db_order.id)
        .bind(item.package_id)
        .bind(&item.package_name)
        .bind(item.price_cents)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
        .bind(auth.user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let order = Order::from_parts(db_order, cart.items)?;
    tracing::info!(order_id = order.id, reference = %order.reference, total_cents = order.total_cents, "order placed");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(messages::CHECKOUT_SUCCESS, order))))
}
