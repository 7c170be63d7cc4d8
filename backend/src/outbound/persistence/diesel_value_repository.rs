//! PostgreSQL-backed `ValueRepository` implementation using Diesel ORM.
//!
//! Deletes are soft: they stamp `deleted_at`, and every read filters on
//! `deleted_at IS NULL`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{ValueRepository, ValueRepositoryError};
use crate::domain::{Value, ValueId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewValueRow, ValueRow, ValueUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::values;

/// Diesel-backed implementation of the [`ValueRepository`] port.
#[derive(Clone)]
pub struct DieselValueRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselValueRepository {
    /// Create a repository stamping rows with the system clock.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Create a repository stamping rows with `clock`.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        storage_timestamp(self.clock.utc())
    }
}

/// Truncate to the microsecond precision `TIMESTAMPTZ` stores.
fn storage_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

fn map_pool_error(error: PoolError) -> ValueRepositoryError {
    map_basic_pool_error(error, ValueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ValueRepositoryError {
    map_basic_diesel_error(
        error,
        ValueRepositoryError::query,
        ValueRepositoryError::connection,
    )
}

#[async_trait]
impl ValueRepository for DieselValueRepository {
    async fn get(&self, id: ValueId) -> Result<Value, ValueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ValueRow> = values::table
            .filter(values::id.eq(id.get()))
            .filter(values::deleted_at.is_null())
            .select(ValueRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Value::from)
            .ok_or_else(|| ValueRepositoryError::not_found(id.get()))
    }

    async fn get_all(&self) -> Result<Vec<Value>, ValueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ValueRow> = values::table
            .filter(values::deleted_at.is_null())
            .order(values::id.asc())
            .select(ValueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Value::from).collect())
    }

    async fn create(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.now();

        let new_row = NewValueRow {
            name: value.name(),
            created_at: now,
            updated_at: now,
        };
        let id: i64 = diesel::insert_into(values::table)
            .values(&new_row)
            .returning(values::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(value_id = id, "value inserted");
        value.mark_persisted(ValueId::new(id), now);
        Ok(())
    }

    async fn update(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ValueUpdate {
            name: value.name(),
            updated_at: self.now(),
        };

        let updated_at: Option<DateTime<Utc>> = diesel::update(
            values::table
                .filter(values::id.eq(value.id().get()))
                .filter(values::deleted_at.is_null()),
        )
        .set(&changes)
        .returning(values::updated_at)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        let updated_at = updated_at.ok_or_else(|| ValueRepositoryError::not_found(value.id().get()))?;
        value.mark_updated(updated_at);
        Ok(())
    }

    async fn delete(&self, id: ValueId) -> Result<(), ValueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            values::table
                .filter(values::id.eq(id.get()))
                .filter(values::deleted_at.is_null()),
        )
        .set(values::deleted_at.eq(Some(self.now())))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(ValueRepositoryError::not_found(id.get()));
        }
        debug!(value_id = id.get(), "value soft-deleted");
        Ok(())
    }
}
