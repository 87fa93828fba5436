//! In-memory connection provider that counts every store interaction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::acl::eq_ignore_case;
use crate::db::{AclConnection, ConnectionProvider, StoreError};
use crate::models::acl::{MaintenanceRecord, PermissionRecord};

pub fn maintenance_row(is_down: bool) -> MaintenanceRecord {
    MaintenanceRecord {
        id: 1,
        is_down,
        updated_at: Utc::now(),
    }
}

/// An active grant for `role_id` on `resource:mode`, as the join would return it.
pub fn grant(role_id: i64, resource: &str, mode: &str) -> (i64, PermissionRecord) {
    let record = PermissionRecord {
        resource_id: 1,
        resource_code: resource.to_string(),
        resource_name: resource.to_string(),
        resource_description: None,
        resource_disabled: false,
        role_code: "customer".to_string(),
        role_name: "Customer".to_string(),
        role_description: None,
        access_mode: mode.to_string(),
        access_disabled: false,
        timestamp: Utc::now(),
    };
    (role_id, record)
}

#[derive(Debug, Clone, Default)]
pub struct StoreFixture {
    maintenance: Vec<MaintenanceRecord>,
    grants: Vec<(i64, PermissionRecord)>,
    fail_acquire: bool,
    fail_maintenance: bool,
    fail_permissions: bool,
}

impl StoreFixture {
    pub fn with_maintenance(mut self, record: MaintenanceRecord) -> Self {
        self.maintenance.push(record);
        self
    }

    pub fn with_grant(mut self, grant: (i64, PermissionRecord)) -> Self {
        self.grants.push(grant);
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.fail_acquire = true;
        self
    }

    pub fn failing_maintenance(mut self) -> Self {
        self.fail_maintenance = true;
        self
    }

    pub fn failing_permissions(mut self) -> Self {
        self.fail_permissions = true;
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicUsize,
    released: AtomicUsize,
    maintenance_queries: AtomicUsize,
    permission_queries: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub acquired: usize,
    pub released: usize,
    pub maintenance_queries: usize,
    pub permission_queries: usize,
}

impl Calls {
    pub fn store_calls(&self) -> usize {
        self.acquired + self.maintenance_queries + self.permission_queries
    }
}

#[derive(Debug, Clone)]
pub struct FakeProvider {
    fixture: Arc<StoreFixture>,
    counters: Arc<Counters>,
}

impl FakeProvider {
    pub fn new(fixture: StoreFixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn calls(&self) -> Calls {
        Calls {
            acquired: self.counters.acquired.load(Ordering::SeqCst),
            released: self.counters.released.load(Ordering::SeqCst),
            maintenance_queries: self.counters.maintenance_queries.load(Ordering::SeqCst),
            permission_queries: self.counters.permission_queries.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug)]
pub struct FakeConnection {
    fixture: Arc<StoreFixture>,
    counters: Arc<Counters>,
}

#[async_trait]
impl ConnectionProvider for FakeProvider {
    type Connection = FakeConnection;

    async fn acquire(&self) -> Result<Self::Connection, StoreError> {
        if self.fixture.fail_acquire {
            return Err(StoreError::Connection(sqlx::Error::PoolTimedOut));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(FakeConnection {
            fixture: Arc::clone(&self.fixture),
            counters: Arc::clone(&self.counters),
        })
    }

    fn release(&self, _conn: Self::Connection) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AclConnection for FakeConnection {
    async fn maintenance_rows(&mut self) -> Result<Vec<MaintenanceRecord>, StoreError> {
        self.counters.maintenance_queries.fetch_add(1, Ordering::SeqCst);
        if self.fixture.fail_maintenance {
            return Err(StoreError::Query(sqlx::Error::Protocol("maintenance lookup failed".into())));
        }
        Ok(self.fixture.maintenance.clone())
    }

    async fn permission_rows(
        &mut self,
        role_id: i64,
        resource: &str,
        mode: &str,
    ) -> Result<Vec<PermissionRecord>, StoreError> {
        self.counters.permission_queries.fetch_add(1, Ordering::SeqCst);
        if self.fixture.fail_permissions {
            return Err(StoreError::Query(sqlx::Error::Protocol("permission lookup failed".into())));
        }
        Ok(self
            .fixture
            .grants
            .iter()
            .filter(|(grant_role, record)| {
                *grant_role == role_id
                    && eq_ignore_case(&record.resource_code, resource)
                    && eq_ignore_case(&record.access_mode, mode)
            })
            .map(|(_, record)| record.clone())
            .collect())
    }
}
