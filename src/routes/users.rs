use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::acl::{self, modes, resources};
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::jwt::AuthUser;
use crate::messages;
use crate::models::user::{DbUser, Session, SessionUser, SigninRequest, SignupRequest, User};
use crate::response::ApiResponse;
use crate::utils::{hash_password, normalize_email, verify_password};

/// Role given to self-service accounts.
const SIGNUP_ROLE: &str = "customer";

const USER_SELECT: &str = "\
    SELECT u.id, u.name, u.email, u.password_hash, u.role_id, r.code AS role_code, u.created_at, u.updated_at \
    FROM users u INNER JOIN role r ON r.id = u.role_id";

#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Email already in use"),
        (status = 503, description = "Service is under maintenance")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let pool = state.db.pool();
    let email = normalize_email(&payload.email)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }

    ensure_email_available(pool, &email).await?;
    let password_hash = hash_password(&payload.password)?;

    let inserted = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role_id) \
         SELECT ?, ?, ?, id FROM role WHERE code = ?",
    )
    .bind(name)
    .bind(&email)
    .bind(password_hash)
    .bind(SIGNUP_ROLE)
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(AppError::configuration(format!("role {SIGNUP_ROLE} is not seeded")));
    }

    let user = User::from(fetch_user_by_id(pool, inserted.last_insert_rowid()).await?);
    tracing::info!(user_id = user.id, role_code = %user.role_code, "user signed up");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(messages::USER_CREATE_SUCCESS, user))))
}

#[utoipa::path(
    post,
    path = "/users/signin",
    tag = "Users",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in; returns the session", body = Session),
        (status = 401, description = "Invalid credentials or no access to user accounts"),
        (status = 503, description = "Service is under maintenance")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SigninRequest>,
) -> AppResult<Json<ApiResponse<Session>>> {
    let email = normalize_email(&payload.email).map_err(|_| AppError::unauthorized(messages::USER_SIGNIN_FAILED))?;

    let db_user = sqlx::query_as::<_, DbUser>(&format!("{USER_SELECT} WHERE u.email = ?"))
        .bind(&email)
        .fetch_optional(state.db.pool())
        .await?
        .ok_or_else(|| AppError::unauthorized(messages::USER_SIGNIN_FAILED))?;

    if !verify_password(&payload.password, &db_user.password_hash) {
        return Err(AppError::unauthorized(messages::USER_SIGNIN_FAILED));
    }

    let user = User::from(db_user);
    let session = Session {
        token: state.jwt.encode(&user)?,
        user: SessionUser::from(&user),
    };

    acl::login_check(&state, session, resources::USER_ACCOUNT, modes::READ).await
}

#[utoipa::path(
    post,
    path = "/users/signout",
    tag = "Users",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Logout acknowledged"))
)]
pub async fn signout(auth: AuthUser) -> Json<ApiResponse<()>> {
    tracing::debug!(user_id = auth.user_id, "user signed out");
    Json(ApiResponse::message(messages::USER_SIGNED_OUT))
}

async fn ensure_email_available(pool: &SqlitePool, email: &str) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Err(AppError::conflict(messages::USER_EMAIL_TAKEN));
    }

    Ok(())
}

async fn fetch_user_by_id(pool: &SqlitePool, user_id: i64) -> AppResult<DbUser> {
    sqlx::query_as::<_, DbUser>(&format!("{USER_SELECT} WHERE u.id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))
}
