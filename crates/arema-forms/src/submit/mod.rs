#![forbid(unsafe_code)]

//! Submission contracts: the external submit action, its failure type, the
//! classified [`SubmissionError`] and the results of a submit attempt.

pub mod token;

use std::fmt;
use std::future::Future;

use crate::validation::FieldValues;

pub use token::{DEFAULT_TRACE_CAPACITY, SubmissionEvent, SubmissionTrace, SubmitToken};

/// Status code the backend uses for rejected input.
pub const STATUS_BAD_REQUEST: u16 = 400;

// ---------------------------------------------------------------------------
// SubmitAction
// ---------------------------------------------------------------------------

/// The external call that persists form values.
///
/// The action receives an owned copy of the values captured at submit time.
pub trait SubmitAction {
    /// Submit `values`.
    fn submit(&self, values: FieldValues) -> impl Future<Output = Result<(), SubmitFailure>>;
}

/// A [`SubmitAction`] backed by a closure. Built with [`submit_fn`].
#[derive(Debug, Clone, Copy)]
pub struct SubmitFn<F>(F);

/// Use a closure returning a future as a [`SubmitAction`].
pub fn submit_fn<F, Fut>(f: F) -> SubmitFn<F>
where
    F: Fn(FieldValues) -> Fut,
    Fut: Future<Output = Result<(), SubmitFailure>>,
{
    SubmitFn(f)
}

impl<F, Fut> SubmitAction for SubmitFn<F>
where
    F: Fn(FieldValues) -> Fut,
    Fut: Future<Output = Result<(), SubmitFailure>>,
{
    fn submit(&self, values: FieldValues) -> impl Future<Output = Result<(), SubmitFailure>> {
        (self.0)(values)
    }
}

// ---------------------------------------------------------------------------
// SubmitFailure
// ---------------------------------------------------------------------------

/// Error reported by a submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFailure {
    /// Backend status code, when the failure carries one.
    pub status: Option<u16>,
    /// Free-form detail for logs. Never shown to the user.
    pub detail: String,
}

impl SubmitFailure {
    /// A failure without a status code.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            detail: detail.into(),
        }
    }

    /// A failure with a status code.
    #[must_use]
    pub fn with_status(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "submit failed with status {status}: {}", self.detail),
            None => write!(f, "submit failed: {}", self.detail),
        }
    }
}

impl std::error::Error for SubmitFailure {}

// ---------------------------------------------------------------------------
// SubmissionError
// ---------------------------------------------------------------------------

/// Classified submission failure shown as the form's top-level message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionError {
    /// The backend rejected the input (status 400).
    InvalidInput,
    /// Anything else, including transport failures without a status.
    Unknown,
}

impl SubmissionError {
    /// Classify a submit failure.
    #[must_use]
    pub fn classify(failure: &SubmitFailure) -> Self {
        match failure.status {
            Some(STATUS_BAD_REQUEST) => Self::InvalidInput,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => f.write_str("input invalid"),
            Self::Unknown => f.write_str("unknown error"),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// User-facing texts for submission results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitMessages {
    /// Success notification.
    pub success: String,
    /// Banner for [`SubmissionError::InvalidInput`].
    pub invalid_input: String,
    /// Banner for [`SubmissionError::Unknown`].
    pub unknown: String,
}

impl Default for SubmitMessages {
    fn default() -> Self {
        Self {
            success: "新規会員登録に成功しました".to_string(),
            invalid_input: "入力した情報が正しくありません".to_string(),
            unknown: "不明なエラーが発生しました".to_string(),
        }
    }
}

impl SubmitMessages {
    /// Banner text for a classified failure.
    #[must_use]
    pub fn for_error(&self, error: SubmissionError) -> &str {
        match error {
            SubmissionError::InvalidInput => &self.invalid_input,
            SubmissionError::Unknown => &self.unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Submit attempt results
// ---------------------------------------------------------------------------

/// Why a submit attempt did not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Another submission is in flight.
    InFlight,
    /// Fields still have validation errors.
    ValidationErrors {
        /// Fields with errors.
        fields: Vec<String>,
    },
    /// The dialog is closed.
    Closed,
}

impl fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InFlight => f.write_str("a submission is already in flight"),
            Self::ValidationErrors { fields } => {
                write!(f, "validation errors in: {}", fields.join(", "))
            }
            Self::Closed => f.write_str("dialog is closed"),
        }
    }
}

impl std::error::Error for SubmitRejected {}

/// A started submission: its token and the values it captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    /// Token to pass back on completion.
    pub token: SubmitToken,
    /// Values copied at submit time.
    pub values: FieldValues,
}

/// How a resolved submission affected the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Applied as success; the host was notified and closed.
    Succeeded,
    /// Applied as failure; the banner is set.
    Failed(SubmissionError),
    /// The token was no longer in flight; nothing changed.
    Discarded,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_status() {
        assert_eq!(
            SubmissionError::classify(&SubmitFailure::with_status(400, "bad")),
            SubmissionError::InvalidInput
        );
        assert_eq!(
            SubmissionError::classify(&SubmitFailure::with_status(409, "conflict")),
            SubmissionError::Unknown
        );
        assert_eq!(
            SubmissionError::classify(&SubmitFailure::new("network down")),
            SubmissionError::Unknown
        );
    }

    #[test]
    fn messages_per_error() {
        let messages = SubmitMessages::default();
        assert_eq!(
            messages.for_error(SubmissionError::InvalidInput),
            "入力した情報が正しくありません"
        );
        assert_eq!(
            messages.for_error(SubmissionError::Unknown),
            "不明なエラーが発生しました"
        );
    }

    #[test]
    fn display_impls() {
        assert_eq!(
            SubmitFailure::with_status(500, "boom").to_string(),
            "submit failed with status 500: boom"
        );
        assert_eq!(SubmissionError::InvalidInput.to_string(), "input invalid");
        assert_eq!(
            SubmitRejected::ValidationErrors {
                fields: vec!["email".into(), "password".into()]
            }
            .to_string(),
            "validation errors in: email, password"
        );
    }

    #[test]
    fn submit_fn_forwards_values() {
        let action = submit_fn(|values: FieldValues| async move {
            if values.contains_key("email") {
                Ok(())
            } else {
                Err(SubmitFailure::new("missing"))
            }
        });
        let mut values = FieldValues::new();
        assert!(pollster::block_on(action.submit(values.clone())).is_err());
        values.insert("email".into(), "a@b.com".into());
        assert!(pollster::block_on(action.submit(values)).is_ok());
    }
}
