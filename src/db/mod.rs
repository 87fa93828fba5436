//! Connection provider and the store operations the access-control pipeline
//! runs on an acquired connection.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};

use crate::acl::{maintenance, resolver};
use crate::models::acl::{MaintenanceRecord, PermissionRecord};

pub async fn init() -> anyhow::Result<SqlitePool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(pool)
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The pool could not hand out a connection.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),
}

/// Hands out store connections.
///
/// `release` consumes the connection, so a connection can be given back at most
/// once, and a failed `acquire` leaves nothing to release.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Connection: AclConnection;

    async fn acquire(&self) -> Result<Self::Connection, StoreError>;

    fn release(&self, conn: Self::Connection);
}

/// Queries the access-control pipeline issues on a connection. The SQL text
/// lives next to the stage that owns it.
#[async_trait]
pub trait AclConnection: Send {
    async fn maintenance_rows(&mut self) -> Result<Vec<MaintenanceRecord>, StoreError>;

    async fn permission_rows(
        &mut self,
        role_id: i64,
        resource: &str,
        mode: &str,
    ) -> Result<Vec<PermissionRecord>, StoreError>;
}

/// Pool-backed provider used by the running service.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionProvider for Database {
    type Connection = PoolConnection<Sqlite>;

    async fn acquire(&self) -> Result<Self::Connection, StoreError> {
        self.pool.acquire().await.map_err(StoreError::Connection)
    }

    fn release(&self, conn: Self::Connection) {
        // returning the handle to the pool is the release
        drop(conn);
    }
}

#[async_trait]
impl AclConnection for PoolConnection<Sqlite> {
    async fn maintenance_rows(&mut self) -> Result<Vec<MaintenanceRecord>, StoreError> {
        sqlx::query_as::<_, MaintenanceRecord>(maintenance::MAINTENANCE_QUERY)
            .fetch_all(&mut **self)
            .await
            .map_err(StoreError::Query)
    }

    async fn permission_rows(
        &mut self,
        role_id: i64,
        resource: &str,
        mode: &str,
    ) -> Result<Vec<PermissionRecord>, StoreError> {
        sqlx::query_as::<_, PermissionRecord>(resolver::PERMISSION_QUERY)
            .bind(role_id)
            .bind(resource)
            .bind(mode)
            .fetch_all(&mut **self)
            .await
            .map_err(StoreError::Query)
    }
}
