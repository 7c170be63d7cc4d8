//! Diesel table definitions for the PostgreSQL schema.
//!
//! Kept in sync with `backend/migrations` by hand; regenerate with
//! `diesel print-schema` after adding a migration.

diesel::table! {
    /// Application users referenced for authorisation.
    users (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Lower-cased login e-mail, unique.
        email -> Varchar,
        /// PHC-format password hash.
        password_hash -> Varchar,
        /// Whether the user may mutate values.
        is_admin -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named values. Rows are soft-deleted through `deleted_at`.
    values (id) {
        /// Primary key assigned by a sequence; insertion order.
        id -> Int8,
        /// Display name, never blank.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker; live rows hold `NULL`.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, values);
