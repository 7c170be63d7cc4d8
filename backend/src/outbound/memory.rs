//! In-memory repositories used when no database is configured, and in tests.
//!
//! Both stores mirror the PostgreSQL adapters: identifiers come from a
//! monotonic counter starting at 1 and value deletes are soft.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    UserPersistenceError, UserRepository, ValueRepository, ValueRepositoryError,
};
use crate::domain::{User, UserId, Value, ValueId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Rows are replaced whole, so a poisoned table is still consistent.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct StoredValue {
    value: Value,
    deleted_at: Option<DateTime<Utc>>,
}

impl StoredValue {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

struct ValueTable {
    rows: Vec<StoredValue>,
    next_id: i64,
}

/// Mutex-guarded vector of values.
pub struct InMemoryValueRepository {
    table: Mutex<ValueTable>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryValueRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryValueRepository {
    /// Empty store stamping rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(ValueTable {
                rows: Vec::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    /// Number of rows, soft-deleted ones included.
    pub fn stored_rows(&self) -> usize {
        lock(&self.table).rows.len()
    }
}

#[async_trait]
impl ValueRepository for InMemoryValueRepository {
    async fn get(&self, id: ValueId) -> Result<Value, ValueRepositoryError> {
        lock(&self.table)
            .rows
            .iter()
            .find(|row| row.is_live() && row.value.id() == id)
            .map(|row| row.value.clone())
            .ok_or_else(|| ValueRepositoryError::not_found(id.get()))
    }

    async fn get_all(&self) -> Result<Vec<Value>, ValueRepositoryError> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .filter(|row| row.is_live())
            .map(|row| row.value.clone())
            .collect())
    }

    async fn create(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        let mut table = lock(&self.table);
        let id = ValueId::new(table.next_id);
        table.next_id += 1;
        value.mark_persisted(id, self.clock.utc());
        table.rows.push(StoredValue {
            value: value.clone(),
            deleted_at: None,
        });
        Ok(())
    }

    async fn update(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        let mut table = lock(&self.table);
        let row = table
            .rows
            .iter_mut()
            .find(|row| row.is_live() && row.value.id() == value.id())
            .ok_or_else(|| ValueRepositoryError::not_found(value.id().get()))?;
        value.mark_updated(self.clock.utc());
        row.value = value.clone();
        Ok(())
    }

    async fn delete(&self, id: ValueId) -> Result<(), ValueRepositoryError> {
        let mut table = lock(&self.table);
        let row = table
            .rows
            .iter_mut()
            .find(|row| row.is_live() && row.value.id() == id)
            .ok_or_else(|| ValueRepositoryError::not_found(id.get()))?;
        row.deleted_at = Some(self.clock.utc());
        Ok(())
    }
}

struct UserTable {
    rows: Vec<User>,
    next_id: i64,
}

/// Mutex-guarded vector of users.
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            table: Mutex::new(UserTable {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn upsert(
        &self,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, UserPersistenceError> {
        let mut table = lock(&self.table);
        if let Some(existing) = table.rows.iter_mut().find(|user| user.email() == email) {
            *existing = User::new(existing.id(), email, password_hash, is_admin);
            return Ok(existing.clone());
        }
        let user = User::new(UserId::new(table.next_id), email, password_hash, is_admin);
        table.next_id += 1;
        table.rows.push(user.clone());
        Ok(user)
    }
}
