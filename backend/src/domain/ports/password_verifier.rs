//! Port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing or checking a password.
    pub enum PasswordHashError {
        /// The stored hash is not a parseable PHC string.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
        /// Hashing a new password failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hash and verify passwords against PHC strings.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// Whether `password` matches `hash`.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;

    /// Produce a PHC string for `password`.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;
}
