//! Driving port for login use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown e-mail addresses and wrong passwords both yield
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
