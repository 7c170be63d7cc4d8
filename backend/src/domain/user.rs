//! User identity used for authorisation checks.

use std::fmt;

use serde::Serialize;

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application user.
///
/// Only the fields the controllers need for authorisation are modelled.
/// The password hash is a PHC string and is never serialised.
///
/// # Examples
/// ```
/// use values_app::domain::{User, UserId};
///
/// let user = User::new(UserId::new(1), "ada@example.com", "$argon2id$...", true);
/// assert!(user.is_admin());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    email: String,
    #[serde(skip)]
    password_hash: String,
    is_admin: bool,
}

impl User {
    /// Build a user from stored components.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login e-mail address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Stored password hash in PHC format.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Whether the user may mutate values.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}
