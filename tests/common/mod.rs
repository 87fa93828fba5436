#![allow(dead_code)]

use std::path::Path;

use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

use fbs_api::acl::PrivilegedRoles;
use fbs_api::app::{router, AppState};
use fbs_api::jwt::JwtConfig;
use fbs_api::utils::hash_password;

pub const PASSWORD: &str = "S3cureP@ssw0rd";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn migrated_pool() -> Result<(SqlitePool, TempDir)> {
    let dir = tempfile::tempdir()?;
    let opts = SqliteConnectOptions::new()
        .filename(dir.path().join("test.db"))
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator = sqlx::migrate::Migrator::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
    migrator.run(&pool).await?;

    Ok((pool, dir))
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let (pool, dir) = migrated_pool().await?;
        let state = AppState::new(pool.clone(), JwtConfig::new("test-secret", 1), PrivilegedRoles::default());

        Ok(Self {
            app: router(state),
            pool,
            _dir: dir,
        })
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }

    /// Inserts a user with the given role directly, bypassing sign-up.
    pub async fn insert_user(&self, email: &str, role_code: &str) -> Result<i64> {
        let inserted = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role_id) SELECT ?, ?, ?, id FROM role WHERE code = ?",
        )
        .bind(email)
        .bind(email)
        .bind(hash_password(PASSWORD)?)
        .bind(role_code)
        .execute(&self.pool)
        .await?;
        anyhow::ensure!(inserted.rows_affected() == 1, "role {role_code} is not seeded");
        Ok(inserted.last_insert_rowid())
    }

    pub async fn signin(&self, email: &str) -> Result<(StatusCode, Value)> {
        self.call(
            Method::POST,
            "/users/signin",
            None,
            Some(serde_json::json!({ "email": email, "password": PASSWORD })),
        )
        .await
    }

    /// Creates a user with `role_code` and returns a bearer token for it.
    pub async fn token_for(&self, email: &str, role_code: &str) -> Result<String> {
        self.insert_user(email, role_code).await?;
        let (status, body) = self.signin(email).await?;
        assert_eq!(status, StatusCode::OK, "signin failed: {body}");
        let token = body["data"]["token"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("signin returned no token: {body}"))?;
        Ok(token.to_string())
    }

    pub async fn set_maintenance(&self, is_down: bool) -> Result<()> {
        sqlx::query("UPDATE maintenance SET is_down = ?")
            .bind(is_down)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_grant_disabled(&self, role_code: &str, resource: &str, mode: &str, disabled: bool) -> Result<()> {
        sqlx::query(
            "UPDATE permission SET is_disabled = ? \
             WHERE role_id = (SELECT id FROM role WHERE code = ?) \
               AND resource_id = (SELECT id FROM resource WHERE code = ?) AND mode = ?",
        )
        .bind(disabled)
        .bind(role_code)
        .bind(resource)
        .bind(mode)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_resource_deleted(&self, resource: &str, deleted: bool) -> Result<()> {
        sqlx::query("UPDATE resource SET deleted = ? WHERE code = ?")
            .bind(deleted)
            .bind(resource)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
