//! Validation decorator and service façade over value storage.
//!
//! [`ValueValidator`] runs the validator chain before delegating to the
//! wrapped repository; [`ValuesService`] binds a storage implementation behind
//! the validator so controllers see one [`ValueRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{ValueRepository, ValueRepositoryError};
use super::{
    Value, ValueId, ValueValidatorFn, name_required, positive_id, run_value_validators,
};

const SAVE_VALIDATORS: &[ValueValidatorFn] = &[name_required];
const DELETE_VALIDATORS: &[ValueValidatorFn] = &[positive_id];

/// Repository decorator rejecting invalid candidates before storage sees them.
///
/// Storage errors from the wrapped repository pass through unchanged.
pub struct ValueValidator<R: ?Sized> {
    inner: Arc<R>,
}

impl<R: ?Sized> ValueValidator<R> {
    /// Wrap `inner` with the value validators.
    pub fn new(inner: Arc<R>) -> Self {
        Self { inner }
    }

    fn check(value: &Value, validators: &[ValueValidatorFn]) -> Result<(), ValueRepositoryError> {
        run_value_validators(value, validators).map_err(|reason| {
            debug!(value_id = %value.id(), %reason, "value rejected by validator");
            ValueRepositoryError::invalid(reason)
        })
    }
}

impl<R: ?Sized> Clone for ValueValidator<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<R> ValueRepository for ValueValidator<R>
where
    R: ValueRepository + ?Sized,
{
    async fn get(&self, id: ValueId) -> Result<Value, ValueRepositoryError> {
        self.inner.get(id).await
    }

    async fn get_all(&self) -> Result<Vec<Value>, ValueRepositoryError> {
        self.inner.get_all().await
    }

    async fn create(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        Self::check(value, SAVE_VALIDATORS)?;
        self.inner.create(value).await
    }

    async fn update(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        Self::check(value, SAVE_VALIDATORS)?;
        self.inner.update(value).await
    }

    async fn delete(&self, id: ValueId) -> Result<(), ValueRepositoryError> {
        Self::check(&Value::reference(id), DELETE_VALIDATORS)?;
        self.inner.delete(id).await
    }
}

/// Entity-scoped façade handed to controllers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use values_app::domain::ValuesService;
/// use values_app::outbound::memory::InMemoryValueRepository;
///
/// let service = ValuesService::new(Arc::new(InMemoryValueRepository::default()));
/// # let _ = service;
/// ```
#[derive(Clone)]
pub struct ValuesService {
    validated: ValueValidator<dyn ValueRepository>,
}

impl ValuesService {
    /// Bind `storage` behind the validator.
    pub fn new(storage: Arc<dyn ValueRepository>) -> Self {
        Self {
            validated: ValueValidator::new(storage),
        }
    }
}

#[async_trait]
impl ValueRepository for ValuesService {
    async fn get(&self, id: ValueId) -> Result<Value, ValueRepositoryError> {
        self.validated.get(id).await
    }

    async fn get_all(&self) -> Result<Vec<Value>, ValueRepositoryError> {
        self.validated.get_all().await
    }

    async fn create(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        self.validated.create(value).await
    }

    async fn update(&self, value: &mut Value) -> Result<(), ValueRepositoryError> {
        self.validated.update(value).await
    }

    async fn delete(&self, id: ValueId) -> Result<(), ValueRepositoryError> {
        self.validated.delete(id).await
    }
}
