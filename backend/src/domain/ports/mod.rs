//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_verifier;
mod user_repository;
mod value_repository;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_verifier::MockPasswordVerifier;
pub use password_verifier::{PasswordHashError, PasswordVerifier};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use value_repository::MockValueRepository;
pub use value_repository::{ValueRepository, ValueRepositoryError};
