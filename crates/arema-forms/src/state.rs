#![forbid(unsafe_code)]

//! Form state and its pure reducer.
//!
//! [`FormState`] holds one typed [`FieldState`] per schema field, the current
//! [`FieldErrors`], the submission [`FormStatus`] and the top-level submit
//! error. Every change goes through [`FormState::apply`], which consumes the
//! old state and returns the new one.
//!
//! # Transitions
//!
//! ```text
//! Idle/Failed/Succeeded --SubmitRequested--> Validating
//! Validating --SubmitStarted--> Submitting      (errors empty)
//! Validating --SubmitBlocked--> Idle | Failed   (errors present)
//! Submitting --SubmitSucceeded--> Succeeded
//! Submitting --SubmitFailed--> Failed
//! Failed/Succeeded --SetValue (errors empty)--> Idle
//! ```

use std::collections::BTreeMap;

use crate::submit::SubmissionError;
use crate::validation::{FieldErrors, FieldValues, ValidationSchema};

/// Submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FormStatus {
    /// Editable, nothing pending.
    #[default]
    Idle,
    /// A submit was requested and the schema is being re-checked.
    Validating,
    /// The submit action is in flight.
    Submitting,
    /// The last submission failed; the banner is set.
    Failed,
    /// The last submission succeeded.
    Succeeded,
}

impl FormStatus {
    /// Returns `true` if a submit may be requested from this status.
    #[must_use]
    pub fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Failed | Self::Succeeded)
    }
}

/// Per-field record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// Current value.
    pub value: String,
    /// Set on the first edit (or on a blocked submit); gates error display.
    pub touched: bool,
}

/// Input to [`FormState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// A user edit. Unknown fields are ignored.
    SetValue { name: String, value: String },
    /// Re-validate and enter `Validating`.
    SubmitRequested,
    /// Validation failed; leave `Validating`.
    SubmitBlocked,
    /// The submit action was invoked.
    SubmitStarted,
    /// The submit action resolved successfully.
    SubmitSucceeded,
    /// The submit action failed.
    SubmitFailed {
        error: SubmissionError,
        message: String,
    },
    /// Hide the top-level submit error.
    DismissSubmitError,
    /// Back to the initial state.
    Reset,
}

/// Complete state of one form instance.
///
/// `Default` is an empty state with no fields; use [`FormState::new`] for a
/// schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, FieldState>,
    errors: FieldErrors,
    status: FormStatus,
    submit_error: Option<String>,
    failure: Option<SubmissionError>,
}

impl FormState {
    /// Initial state for `schema`: every field empty and untouched, errors
    /// already computed so submission starts disabled when fields are required.
    #[must_use]
    pub fn new(schema: &ValidationSchema) -> Self {
        let fields: BTreeMap<String, FieldState> = schema
            .field_names()
            .map(|name| (name.to_string(), FieldState::default()))
            .collect();
        let mut state = Self {
            fields,
            errors: FieldErrors::new(),
            status: FormStatus::Idle,
            submit_error: None,
            failure: None,
        };
        state.errors = schema.validate(&state.values());
        state
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Current validation errors.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Top-level submit error text.
    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Classification of the last failure, while its banner is shown.
    #[must_use]
    pub fn failure(&self) -> Option<SubmissionError> {
        self.failure
    }

    /// Record for `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// Current value of `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|field| field.value.as_str())
    }

    /// Owned snapshot of all values.
    #[must_use]
    pub fn values(&self) -> FieldValues {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value.clone()))
            .collect()
    }

    /// Returns `true` if `name` has been touched.
    #[must_use]
    pub fn is_touched(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|field| field.touched)
    }

    /// The error to render next to `name`: the first message, once touched.
    #[must_use]
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.errors.first(name)
        } else {
            None
        }
    }

    /// Returns `true` if any field has a validation error.
    #[must_use]
    pub fn has_validation_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if no field has been touched.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.fields.values().all(|field| !field.touched)
    }

    /// Apply `action` and return the next state.
    #[must_use]
    pub fn apply(mut self, action: FormAction, schema: &ValidationSchema) -> Self {
        match action {
            FormAction::SetValue { name, value } => {
                let Some(field) = self.fields.get_mut(&name) else {
                    return self;
                };
                field.value = value;
                field.touched = true;
                self.revalidate(schema);
                if matches!(self.status, FormStatus::Failed | FormStatus::Succeeded)
                    && self.errors.is_empty()
                {
                    self.status = FormStatus::Idle;
                }
            }
            FormAction::SubmitRequested => {
                if self.status.accepts_submit() {
                    self.fields.values_mut().for_each(|field| field.touched = true);
                    self.revalidate(schema);
                    self.status = FormStatus::Validating;
                }
            }
            FormAction::SubmitBlocked => {
                if self.status == FormStatus::Validating {
                    self.status = if self.submit_error.is_some() {
                        FormStatus::Failed
                    } else {
                        FormStatus::Idle
                    };
                }
            }
            FormAction::SubmitStarted => {
                if self.status == FormStatus::Validating && self.errors.is_empty() {
                    self.status = FormStatus::Submitting;
                    self.submit_error = None;
                    self.failure = None;
                }
            }
            FormAction::SubmitSucceeded => {
                if self.status == FormStatus::Submitting {
                    self.status = FormStatus::Succeeded;
                    self.submit_error = None;
                    self.failure = None;
                }
            }
            FormAction::SubmitFailed { error, message } => {
                if self.status == FormStatus::Submitting {
                    self.status = FormStatus::Failed;
                    self.submit_error = Some(message);
                    self.failure = Some(error);
                }
            }
            FormAction::DismissSubmitError => {
                self.submit_error = None;
                self.failure = None;
                if self.status == FormStatus::Failed && self.errors.is_empty() {
                    self.status = FormStatus::Idle;
                }
            }
            FormAction::Reset => return Self::new(schema),
        }
        self
    }

    fn revalidate(&mut self, schema: &ValidationSchema) {
        self.errors = schema.validate(&self.values());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Email, FieldDescriptor};

    fn schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                FieldDescriptor::new("email")
                    .required("required")
                    .rule(Email::new("invalid")),
            )
            .field(FieldDescriptor::new("note"))
    }

    fn set(name: &str, value: &str) -> FormAction {
        FormAction::SetValue {
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn initial_state_is_validated_but_pristine() {
        let schema = schema();
        let state = FormState::new(&schema);
        assert_eq!(state.status(), FormStatus::Idle);
        assert!(state.has_validation_errors());
        assert!(state.is_pristine());
        assert_eq!(state.visible_error("email"), None);
    }

    #[test]
    fn edit_touches_and_revalidates() {
        let schema = schema();
        let state = FormState::new(&schema).apply(set("email", "nope"), &schema);
        assert!(state.is_touched("email"));
        assert!(!state.is_touched("note"));
        assert_eq!(state.visible_error("email"), Some("invalid"));

        let state = state.apply(set("email", "a@b.com"), &schema);
        assert!(!state.has_validation_errors());
        assert_eq!(state.value("email"), Some("a@b.com"));
    }

    #[test]
    fn unknown_field_is_ignored() {
        let schema = schema();
        let before = FormState::new(&schema);
        let after = before.clone().apply(set("nickname", "x"), &schema);
        assert_eq!(before, after);
    }

    #[test]
    fn blocked_submit_reveals_errors() {
        let schema = schema();
        let state = FormState::new(&schema).apply(FormAction::SubmitRequested, &schema);
        assert_eq!(state.status(), FormStatus::Validating);
        assert_eq!(state.visible_error("email"), Some("required"));

        let state = state
            .apply(FormAction::SubmitStarted, &schema)
            .apply(FormAction::SubmitBlocked, &schema);
        assert_eq!(state.status(), FormStatus::Idle);
    }

    #[test]
    fn failure_then_edit_returns_to_idle() {
        let schema = schema();
        let state = FormState::new(&schema)
            .apply(set("email", "a@b.com"), &schema)
            .apply(FormAction::SubmitRequested, &schema)
            .apply(FormAction::SubmitStarted, &schema)
            .apply(
                FormAction::SubmitFailed {
                    error: SubmissionError::Unknown,
                    message: "oops".into(),
                },
                &schema,
            );
        assert_eq!(state.status(), FormStatus::Failed);
        assert_eq!(state.submit_error(), Some("oops"));
        assert_eq!(state.failure(), Some(SubmissionError::Unknown));

        let invalid = state.clone().apply(set("email", "bad"), &schema);
        assert_eq!(invalid.status(), FormStatus::Failed);

        let valid = invalid.apply(set("email", "c@d.com"), &schema);
        assert_eq!(valid.status(), FormStatus::Idle);
        assert_eq!(valid.submit_error(), Some("oops"));
    }

    #[test]
    fn dismiss_clears_banner() {
        let schema = schema();
        let state = FormState::new(&schema)
            .apply(set("email", "a@b.com"), &schema)
            .apply(FormAction::SubmitRequested, &schema)
            .apply(FormAction::SubmitStarted, &schema)
            .apply(
                FormAction::SubmitFailed {
                    error: SubmissionError::InvalidInput,
                    message: "bad input".into(),
                },
                &schema,
            )
            .apply(FormAction::DismissSubmitError, &schema);
        assert_eq!(state.status(), FormStatus::Idle);
        assert_eq!(state.submit_error(), None);
        assert_eq!(state.failure(), None);
    }

    #[test]
    fn out_of_order_actions_are_ignored() {
        let schema = schema();
        let state = FormState::new(&schema)
            .apply(FormAction::SubmitSucceeded, &schema)
            .apply(
                FormAction::SubmitFailed {
                    error: SubmissionError::Unknown,
                    message: "x".into(),
                },
                &schema,
            );
        assert_eq!(state.status(), FormStatus::Idle);
        assert_eq!(state.submit_error(), None);
    }

    #[test]
    fn reset_restores_initial_state() {
        let schema = schema();
        let state = FormState::new(&schema)
            .apply(set("email", "a@b.com"), &schema)
            .apply(FormAction::SubmitRequested, &schema)
            .apply(FormAction::Reset, &schema);
        assert_eq!(state, FormState::new(&schema));
    }
}
