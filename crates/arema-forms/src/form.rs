#![forbid(unsafe_code)]

//! The validated submit form: schema, reducer state and one async submission.
//!
//! A submission is split in two synchronous halves so the caller decides how
//! the action future is driven:
//!
//! 1. [`ValidatedSubmitForm::begin_submit`] re-validates, issues a fresh
//!    [`SubmitToken`] and returns a [`SubmitTicket`] with a copy of the values.
//! 2. [`ValidatedSubmitForm::complete_submit`] applies the result, but only if
//!    the token is still the one in flight.
//!
//! [`ValidatedSubmitForm::submit`] runs both halves around the action.

use tracing::{debug, info, warn};

use crate::state::{FormAction, FormState, FormStatus};
use crate::submit::{
    SubmissionError, SubmissionEvent, SubmissionTrace, SubmitAction, SubmitFailure,
    SubmitMessages, SubmitOutcome, SubmitRejected, SubmitTicket, SubmitToken,
};
use crate::validation::{FieldErrors, FieldValues, ValidationSchema};

/// Callbacks the form drives on behalf of its owner.
pub trait FormHost {
    /// Show a success notification. Called before [`FormHost::close`].
    fn notify_success(&mut self, message: &str);

    /// Close the surface hosting the form.
    fn close(&mut self);

    /// Switch to the alternate view (e.g. sign-in).
    fn open_alternate(&mut self) {}
}

/// Collects field values, validates them and runs one submission at a time.
pub struct ValidatedSubmitForm<H> {
    schema: ValidationSchema,
    state: FormState,
    messages: SubmitMessages,
    host: H,
    last_token: SubmitToken,
    in_flight: Option<SubmitToken>,
    trace: SubmissionTrace,
}

impl<H: FormHost> ValidatedSubmitForm<H> {
    /// Create a form in its initial state.
    pub fn new(schema: ValidationSchema, messages: SubmitMessages, host: H) -> Self {
        let state = FormState::new(&schema);
        Self {
            schema,
            state,
            messages,
            host,
            last_token: SubmitToken::NONE,
            in_flight: None,
            trace: SubmissionTrace::default(),
        }
    }

    /// Keep at most `capacity` submission events.
    #[must_use]
    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace = SubmissionTrace::with_capacity(capacity);
        self
    }

    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn status(&self) -> FormStatus {
        self.state.status()
    }

    pub fn errors(&self) -> &FieldErrors {
        self.state.errors()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.state.submit_error()
    }

    pub fn messages(&self) -> &SubmitMessages {
        &self.messages
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn trace(&self) -> &SubmissionTrace {
        &self.trace
    }

    /// Token of the submission in flight, if any.
    pub fn in_flight(&self) -> Option<SubmitToken> {
        self.in_flight
    }

    /// Visible error for `name`; see [`FormState::visible_error`].
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        self.state.visible_error(name)
    }

    /// Pure validation of an arbitrary value snapshot against this schema.
    pub fn validate(&self, values: &FieldValues) -> FieldErrors {
        self.schema.validate(values)
    }

    pub fn has_validation_errors(&self) -> bool {
        self.state.has_validation_errors()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.in_flight.is_none()
            && self.state.status().accepts_submit()
            && !self.state.has_validation_errors()
    }

    /// Update one field and re-validate. Returns `false` for unknown fields.
    pub fn set_field_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.schema.contains(name) {
            warn!(field = name, "ignoring value for undeclared field");
            return false;
        }
        self.dispatch(FormAction::SetValue {
            name: name.to_string(),
            value: value.into(),
        });
        debug!(
            field = name,
            errors = self.state.errors().len(),
            status = ?self.state.status(),
            "field updated"
        );
        true
    }

    /// Hide the top-level submit error.
    pub fn dismiss_submit_error(&mut self) {
        self.dispatch(FormAction::DismissSubmitError);
    }

    /// Start a submission.
    ///
    /// Rejected while another submission is in flight, or when validation
    /// fails; in the latter case every field becomes touched.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        if self.in_flight.is_some() || !self.state.status().accepts_submit() {
            debug!("submit ignored: already in flight");
            return Err(SubmitRejected::InFlight);
        }

        self.dispatch(FormAction::SubmitRequested);
        if self.state.has_validation_errors() {
            self.dispatch(FormAction::SubmitBlocked);
            let fields = self.state.errors().fields();
            debug!(?fields, "submit blocked by validation errors");
            return Err(SubmitRejected::ValidationErrors { fields });
        }

        let token = self.last_token.next();
        self.last_token = token;
        self.in_flight = Some(token);
        self.dispatch(FormAction::SubmitStarted);
        self.trace.push(SubmissionEvent::Started { token });
        info!(%token, "submission started");

        Ok(SubmitTicket {
            token,
            values: self.state.values(),
        })
    }

    /// Apply the result of the submission identified by `token`.
    ///
    /// On success the host is notified, then closed. Results for a token that
    /// is no longer in flight change nothing.
    pub fn complete_submit(
        &mut self,
        token: SubmitToken,
        result: Result<(), SubmitFailure>,
    ) -> SubmitOutcome {
        let ok = result.is_ok();
        self.trace.push(SubmissionEvent::Resolved { token, ok });

        if self.in_flight != Some(token) {
            let current = self.in_flight.unwrap_or(SubmitToken::NONE);
            self.trace
                .push(SubmissionEvent::StaleDiscarded { token, current });
            debug!(%token, %current, "discarding stale submission result");
            return SubmitOutcome::Discarded;
        }
        self.in_flight = None;

        let outcome = match result {
            Ok(()) => {
                self.dispatch(FormAction::SubmitSucceeded);
                info!(%token, "submission succeeded");
                SubmitOutcome::Succeeded
            }
            Err(failure) => {
                let error = SubmissionError::classify(&failure);
                let message = self.messages.for_error(error).to_string();
                warn!(%token, status = ?failure.status, detail = %failure.detail, %error, "submission failed");
                self.dispatch(FormAction::SubmitFailed { error, message });
                SubmitOutcome::Failed(error)
            }
        };
        self.trace.push(SubmissionEvent::Applied { token, ok });

        if outcome == SubmitOutcome::Succeeded {
            self.host.notify_success(&self.messages.success);
            self.host.close();
        }
        outcome
    }

    /// Run a whole submission against `action`.
    pub async fn submit<A: SubmitAction>(
        &mut self,
        action: &A,
    ) -> Result<SubmitOutcome, SubmitRejected> {
        let SubmitTicket { token, values } = self.begin_submit()?;
        let result = action.submit(values).await;
        Ok(self.complete_submit(token, result))
    }

    /// Return to the initial state. A submission in flight is abandoned: its
    /// result will be discarded.
    pub fn reset(&mut self) {
        if let Some(token) = self.in_flight.take() {
            self.trace.push(SubmissionEvent::Abandoned { token });
            debug!(%token, "abandoning in-flight submission");
        }
        self.dispatch(FormAction::Reset);
    }

    fn dispatch(&mut self, action: FormAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action, &self.schema);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
