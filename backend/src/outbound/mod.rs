//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: in-process stores used without a database.
//! - **password**: Argon2 password hashing.

pub mod memory;
pub mod password;
pub mod persistence;
