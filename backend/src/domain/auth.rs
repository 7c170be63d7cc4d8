//! Login credentials.
//!
//! Handlers build [`LoginCredentials`] from raw form input before talking to
//! the login port, so the port only ever sees well-formed values.

use zeroize::Zeroizing;

/// Reasons raw login input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// E-mail was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty; whitespace is preserved and the buffer is
///   zeroed on drop.
///
/// # Examples
/// ```
/// use values_app::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Example.com ", "pw").unwrap();
/// assert_eq!(creds.email(), "admin@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised e-mail used for lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn rejects_blank_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }
}
