//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{User, UserId, Value, ValueId};

use super::schema::{users, values};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::new(row.id), row.email, row.password_hash, row.is_admin)
    }
}

/// Insertable struct for user upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading live values.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ValueRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ValueRow> for Value {
    fn from(row: ValueRow) -> Self {
        Value::from_parts(ValueId::new(row.id), row.name, row.created_at, row.updated_at)
    }
}

/// Insertable struct for new values.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = values)]
pub(crate) struct NewValueRow<'a> {
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by value updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = values)]
pub(crate) struct ValueUpdate<'a> {
    pub name: &'a str,
    pub updated_at: DateTime<Utc>,
}
