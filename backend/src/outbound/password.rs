//! Argon2 implementation of the password hashing port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier as _};

use crate::domain::ports::{PasswordHashError, PasswordVerifier};

/// Argon2id with the crate's default parameters.
#[derive(Default, Clone)]
pub struct Argon2PasswordVerifier {
    argon2: Argon2<'static>,
}

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::malformed_hash(err.to_string())),
        }
    }

    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }
}
