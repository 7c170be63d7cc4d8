//! Port for value persistence and the errors it reports.
//!
//! The validating decorator and the service façade implement the same trait,
//! so controllers depend on [`ValueRepository`] alone.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Value, ValueId, ValueValidationError};

use super::define_port_error;

define_port_error! {
    /// Errors raised by value repositories and the layers wrapping them.
    pub enum ValueRepositoryError {
        /// No live value has this identifier.
        NotFound { id: i64 } => "value {id} not found",
        /// A validator rejected the candidate before it reached storage.
        Invalid { reason: ValueValidationError } => "{reason}",
        /// Repository connection could not be established.
        Connection { message: String } => "value repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "value repository query failed: {message}",
    }
}

/// CRUD access to values.
///
/// Soft-deleted values are invisible to every operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValueRepository: Send + Sync {
    /// Fetch one live value.
    ///
    /// Returns [`ValueRepositoryError::NotFound`] when the identifier is
    /// unknown or soft-deleted.
    async fn get(&self, id: ValueId) -> Result<Value, ValueRepositoryError>;

    /// All live values in insertion order.
    async fn get_all(&self) -> Result<Vec<Value>, ValueRepositoryError>;

    /// Persist a new value, assigning its identifier and timestamps in place.
    async fn create(&self, value: &mut Value) -> Result<(), ValueRepositoryError>;

    /// Overwrite the stored name of an existing value.
    async fn update(&self, value: &mut Value) -> Result<(), ValueRepositoryError>;

    /// Soft-delete a value by stamping its deletion time.
    async fn delete(&self, id: ValueId) -> Result<(), ValueRepositoryError>;
}

#[async_trait]
impl<T> ValueRepository for Arc<T>
where
    T: ValueRepository + ?Sized,
{
    async fn get(&self, id: ValueId) -> Result<Value, ValueRepositoryError> {
        (**self).get(id).await
    }

    async fn get_all(&self) -> Result<Vec<Value>, ValueRepositoryError> {
        (**self).get_all().await
    }

    async fn create(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        (**self).create(value).await
    }

    async fn update(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        (**self).update(value).await
    }

    async fn delete(&self, id: ValueId) -> Result<(), ValueRepositoryError> {
        (**self).delete(id).await
    }
}
