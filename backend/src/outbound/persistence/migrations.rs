//! Embedded schema migrations.
//!
//! Diesel's migration harness is synchronous, so each run opens a dedicated
//! `PgConnection` on a blocking thread rather than borrowing from the async
//! pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while migrating the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Opening the migration connection failed.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// Applying or reverting a migration failed.
    #[error("migration failed: {message}")]
    Apply { message: String },
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task did not complete: {message}")]
    Task { message: String },
}

fn connect(database_url: &str) -> Result<PgConnection, MigrationError> {
    PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
        message: err.to_string(),
    })
}

fn apply_pending(conn: &mut PgConnection) -> Result<usize, MigrationError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| applied.len())
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })
}

async fn run_blocking<T, F>(database_url: &str, task: F) -> Result<T, MigrationError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, MigrationError> + Send + 'static,
{
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = connect(&url)?;
        task(&mut conn)
    })
    .await
    .map_err(|err| MigrationError::Task {
        message: err.to_string(),
    })?
}

/// Apply every pending migration. Returns how many were applied.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a
/// migration fails.
pub async fn auto_migrate(database_url: &str) -> Result<usize, MigrationError> {
    let applied = run_blocking(database_url, apply_pending).await?;
    info!(applied, "database migrations up to date");
    Ok(applied)
}

/// Revert every migration, then apply them all again.
///
/// All stored data is lost.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a
/// migration fails in either direction.
pub async fn destructive_reset(database_url: &str) -> Result<(), MigrationError> {
    warn!("destructive reset requested; dropping all tables");
    run_blocking(database_url, |conn| {
        conn.revert_all_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        apply_pending(conn).map(|_| ())
    })
    .await
}
