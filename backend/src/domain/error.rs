//! Domain-level error type.
//!
//! Transport agnostic: the HTTP adapter maps [`ErrorCode`] to a status code and
//! decides how much of the message reaches the client.

use std::fmt;

use super::TraceId;

/// Stable machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated (or anonymous) caller may not perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// A dependency such as the database is unreachable.
    ServiceUnavailable,
    /// An unexpected failure inside the application.
    InternalError,
}

impl ErrorCode {
    /// Whether the message of an error with this code may be shown to users.
    #[must_use]
    pub fn is_user_facing(self) -> bool {
        !matches!(self, Self::ServiceUnavailable | Self::InternalError)
    }
}

/// Message shown instead of internal failure details.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Application error carrying a code, a message and the ambient trace id.
///
/// ## Invariants
/// - `message` is never blank; [`Error::try_new`] rejects whitespace-only input.
///
/// # Examples
/// ```
/// use values_app::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Value not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Value not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

/// Validation failures raised by [`Error::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// Message was empty once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create an error, panicking if the message is blank.
    ///
    /// # Panics
    /// Panics when `message` is empty after trimming; callers pass literals.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(error) => error,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor capturing the current trace identifier.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }

    /// Stable error category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Full message, including internal detail for logs.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Message safe to show to an end user.
    pub fn public_message(&self) -> &str {
        if self.code.is_user_facing() {
            self.message()
        } else {
            GENERIC_ERROR_MESSAGE
        }
    }

    /// Correlation identifier captured at construction time.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Override the trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn try_new_rejects_blank_messages() {
        let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
        assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
    }

    #[rstest]
    #[case(Error::invalid_request("name is required"), "name is required")]
    #[case(Error::forbidden("no access"), "no access")]
    #[case(Error::not_found("Value not found"), "Value not found")]
    #[case(Error::internal("pool exhausted"), GENERIC_ERROR_MESSAGE)]
    #[case(Error::service_unavailable("db down"), GENERIC_ERROR_MESSAGE)]
    fn public_message_hides_internal_detail(#[case] error: Error, #[case] expected: &str) {
        assert_eq!(error.public_message(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id = TraceId::generate();
        let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
    }

    #[rstest]
    fn no_trace_id_out_of_scope() {
        assert!(Error::internal("boom").trace_id().is_none());
    }
}
