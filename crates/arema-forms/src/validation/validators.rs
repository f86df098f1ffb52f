#![forbid(unsafe_code)]

//! Core validation types and the built-in field validators.

use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// Error code for a required field left empty.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Error code for a malformed email address.
pub const ERROR_CODE_EMAIL: &str = "email";
/// Error code for a password that does not meet the policy.
pub const ERROR_CODE_PASSWORD: &str = "password";
/// Error code for an injected predicate that rejected the value.
pub const ERROR_CODE_CUSTOM: &str = "custom";

/// Default minimum password length.
pub const DEFAULT_PASSWORD_MIN_LEN: usize = 8;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A field-level validation error.
///
/// `code` is stable and meant for programmatic handling; `message` is the
/// text shown next to the field. `{key}` placeholders in the message are
/// filled from `params` by [`ValidationError::format_message`].
///
/// ```rust
/// use arema_forms::validation::ValidationError;
///
/// let error = ValidationError::new("password", "At least {min} characters")
///     .with_param("min", 8);
/// assert_eq!(error.format_message(), "At least 8 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code.
    pub code: &'static str,
    /// Message template.
    pub message: String,
    /// Interpolation parameters.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Create an error with the given code and message.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Attach an interpolation parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Render the message with every `{key}` replaced by its parameter.
    #[must_use]
    pub fn format_message(&self) -> String {
        self.params
            .iter()
            .fold(self.message.clone(), |message, (key, value)| {
                message.replace(&format!("{{{key}}}"), value)
            })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of running one validator against one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value passed.
    #[default]
    Valid,
    /// The value failed with an error.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the value passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` if the value failed.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// The rendered error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }

    fn check(passed: bool, error: impl FnOnce() -> ValidationError) -> Self {
        if passed {
            Self::Valid
        } else {
            Self::Invalid(error())
        }
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A pure check over a field value.
///
/// Implementations must be deterministic: the same input always yields the
/// same result. Schemas rely on this to re-run every rule on every keystroke.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &T) -> ValidationResult;

    /// The message this validator reports on failure.
    fn error_message(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Syntactic email check: `local@domain.tld` with a non-empty local part,
/// non-empty dot-separated domain labels and a TLD of two or more letters.
///
/// The value is checked as submitted: surrounding whitespace makes it
/// invalid. The empty string is not an email.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }
    if labels
        .iter()
        .any(|label| !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Password policy: at least `min_len` characters, no whitespace, and at
/// least one ASCII letter and one ASCII digit.
pub fn is_valid_password(value: &str, min_len: usize) -> bool {
    value.chars().count() >= min_len
        && !value.chars().any(char::is_whitespace)
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Built-in Validators
// ---------------------------------------------------------------------------

/// Fails when the value is empty.
///
/// Only the empty string is empty by default; any other value, whitespace
/// included, is left to the field's rules. With `trim` set, whitespace-only
/// values count as empty too.
#[derive(Debug, Clone)]
pub struct Required {
    /// If `true`, whitespace-only strings are rejected as empty.
    pub trim: bool,
    message: String,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            trim: false,
            message: "This field is required".to_string(),
        }
    }
}

impl Required {
    /// Create a `Required` validator with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat whitespace-only values as empty.
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Replace the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether `value` counts as empty under this rule.
    #[must_use]
    pub fn is_empty(&self, value: &str) -> bool {
        if self.trim {
            value.trim().is_empty()
        } else {
            value.is_empty()
        }
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        ValidationResult::check(!self.is_empty(value), || {
            ValidationError::new(ERROR_CODE_REQUIRED, &self.message)
        })
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Validates email syntax with [`is_valid_email`].
#[derive(Debug, Clone)]
pub struct Email {
    message: String,
}

impl Default for Email {
    fn default() -> Self {
        Self::new("Invalid email address")
    }
}

impl Email {
    /// Create an `Email` validator reporting `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        ValidationResult::check(is_valid_email(value), || {
            ValidationError::new(ERROR_CODE_EMAIL, &self.message)
        })
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Validates the password policy with [`is_valid_password`].
#[derive(Debug, Clone)]
pub struct Password {
    /// Minimum number of characters.
    pub min_len: usize,
    message: String,
}

impl Default for Password {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_MIN_LEN, "Invalid password")
    }
}

impl Password {
    /// Create a `Password` validator reporting `message`.
    #[must_use]
    pub fn new(min_len: usize, message: impl Into<String>) -> Self {
        Self {
            min_len,
            message: message.into(),
        }
    }
}

impl Validator<str> for Password {
    fn validate(&self, value: &str) -> ValidationResult {
        ValidationResult::check(is_valid_password(value, self.min_len), || {
            ValidationError::new(ERROR_CODE_PASSWORD, &self.message)
                .with_param("min", self.min_len)
        })
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

type Check = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Adapts an injected `&str -> bool` predicate into a validator.
pub struct Predicate {
    check: Check,
    code: &'static str,
    message: String,
}

impl Predicate {
    /// Wrap `check`, reporting `message` when it returns `false`.
    #[must_use]
    pub fn new<F>(check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
            code: ERROR_CODE_CUSTOM,
            message: message.into(),
        }
    }

    /// Override the error code.
    #[must_use]
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }
}

impl Validator<str> for Predicate {
    fn validate(&self, value: &str) -> ValidationResult {
        ValidationResult::check((self.check)(value), || {
            ValidationError::new(self.code, &self.message)
        })
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("code", &self.code)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
