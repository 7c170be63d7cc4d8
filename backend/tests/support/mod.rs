//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! common helpers live here instead of being copied between suites.

pub mod cluster_skip;
#[path = "pg_embed.rs"]
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use pg_embedded_setup_unpriv::TestCluster;

/// Drop and recreate `name` on `cluster`, returning its connection URL.
///
/// Database names are interpolated into DDL, so callers pass fixed
/// identifiers only.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<String, String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut conn = PgConnection::establish(&admin_url).map_err(|err| err.to_string())?;
    diesel::sql_query(format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut conn)
        .map_err(|err| format!("drop {name}: {err}"))?;
    diesel::sql_query(format!("CREATE DATABASE \"{name}\""))
        .execute(&mut conn)
        .map_err(|err| format!("create {name}: {err}"))?;
    Ok(cluster.connection().database_url(name))
}
