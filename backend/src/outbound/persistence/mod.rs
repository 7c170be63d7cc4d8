//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! entities. Row structs (`models.rs`) and the schema (`schema.rs`) stay
//! private to this module.
//!
//! # Example
//!
//! ```no_run
//! use values_app::outbound::persistence::{DbPool, DieselValueRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), values_app::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/values")).await?;
//! let repo = DieselValueRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_repository;
mod diesel_value_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use diesel_value_repository::DieselValueRepository;
pub use migrations::{MIGRATIONS, MigrationError, auto_migrate, destructive_reset};
pub use pool::{DbPool, PoolConfig, PoolError};
