//! Field-level validators run before a value mutation reaches storage.
//!
//! Each validator is a pure function of the candidate. They run in the order
//! given and the first failure is the one reported.

use super::Value;

/// Reasons a candidate value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueValidationError {
    /// `name` was empty once trimmed.
    #[error("name is required")]
    NameRequired,
    /// The identifier was zero or negative.
    #[error("value ID must be a positive integer")]
    IdInvalid,
}

/// Signature shared by every value validator.
pub type ValueValidatorFn = fn(&Value) -> Result<(), ValueValidationError>;

/// Run `validators` in order, stopping at the first failure.
///
/// # Examples
/// ```
/// use values_app::domain::{
///     Value, ValueValidationError, name_required, positive_id, run_value_validators,
/// };
///
/// let candidate = Value::new("");
/// let result = run_value_validators(&candidate, &[name_required, positive_id]);
/// assert_eq!(result, Err(ValueValidationError::NameRequired));
/// ```
pub fn run_value_validators(
    value: &Value,
    validators: &[ValueValidatorFn],
) -> Result<(), ValueValidationError> {
    validators.iter().try_for_each(|validate| validate(value))
}

/// Reject blank names.
pub fn name_required(value: &Value) -> Result<(), ValueValidationError> {
    if value.name().trim().is_empty() {
        return Err(ValueValidationError::NameRequired);
    }
    Ok(())
}

/// Reject identifiers that storage could never have assigned.
pub fn positive_id(value: &Value) -> Result<(), ValueValidationError> {
    if !value.id().is_assigned() {
        return Err(ValueValidationError::IdInvalid);
    }
    Ok(())
}
