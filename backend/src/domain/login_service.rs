//! Repository-backed implementation of the login port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{LoginService, PasswordVerifier, UserPersistenceError, UserRepository};
use super::{Error, LoginCredentials, User};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Authenticate by e-mail lookup and password hash verification.
pub struct UserLoginService<U: ?Sized, P: ?Sized> {
    users: Arc<U>,
    verifier: Arc<P>,
}

impl<U: ?Sized, P: ?Sized> UserLoginService<U, P> {
    /// Create a login service over `users`, checking passwords with `verifier`.
    pub fn new(users: Arc<U>, verifier: Arc<P>) -> Self {
        Self { users, verifier }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[async_trait]
impl<U, P> LoginService for UserLoginService<U, P>
where
    U: UserRepository + ?Sized,
    P: PasswordVerifier + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            info!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .verifier
            .verify(credentials.password(), user.password_hash())
            .map_err(|err| {
                warn!(user_id = %user.id(), error = %err, "stored password hash unusable");
                Error::internal(err.to_string())
            })?;
        if !matches {
            info!(user_id = %user.id(), "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user)
    }
}
