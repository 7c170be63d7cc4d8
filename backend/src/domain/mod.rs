//! Domain entities, validators and services.
//!
//! Public surface:
//! - [`Value`] and [`ValueId`]: the named value entity.
//! - [`User`] and [`UserId`]: identities referenced for authorisation.
//! - [`ValueValidator`] and [`ValuesService`]: validation decorator and
//!   façade over value storage.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.

pub mod auth;
pub mod error;
pub mod login_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod value;
pub mod value_validation;
pub mod values_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, GENERIC_ERROR_MESSAGE};
pub use self::login_service::UserLoginService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId};
pub use self::value::{Value, ValueId};
pub use self::value_validation::{
    ValueValidationError, ValueValidatorFn, name_required, positive_id, run_value_validators,
};
pub use self::values_service::{ValueValidator, ValuesService};
