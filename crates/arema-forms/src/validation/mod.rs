#![forbid(unsafe_code)]

//! Field validation: composable validators and declarative schemas.
//!
//! - [`Validator`] is the pure per-value check.
//! - Built-ins cover required fields, email syntax and the password policy;
//!   [`Predicate`] adapts any injected `&str -> bool` function.
//! - [`ValidationSchema`] is an ordered list of [`FieldDescriptor`]s and
//!   validates a whole [`FieldValues`] snapshot in one pure pass.
//!
//! # Example
//!
//! ```rust
//! use arema_forms::validation::{Required, Validator};
//!
//! let required = Required::new();
//! assert!(required.validate("hello").is_valid());
//! assert!(!required.validate("").is_valid());
//! assert!(required.validate("  ").is_valid());
//! assert!(!required.trim(true).validate("  ").is_valid());
//! ```

mod schema;
mod validators;

pub use schema::{FieldDescriptor, FieldErrors, FieldValues, ValidationSchema};
pub use validators::{
    DEFAULT_PASSWORD_MIN_LEN, ERROR_CODE_CUSTOM, ERROR_CODE_EMAIL, ERROR_CODE_PASSWORD,
    ERROR_CODE_REQUIRED, Email, Password, Predicate, Required, ValidationError, ValidationResult,
    Validator, is_valid_email, is_valid_password,
};
