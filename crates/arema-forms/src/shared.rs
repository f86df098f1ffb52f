#![forbid(unsafe_code)]

//! A cloneable handle for driving one form from several tasks.
//!
//! The lock is held only while a submission begins and while its result is
//! applied, never across the action's await point, so edits and resets made
//! while a submission is in flight are not blocked.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::form::{FormHost, ValidatedSubmitForm};
use crate::state::FormStatus;
use crate::submit::{SubmitAction, SubmitOutcome, SubmitRejected, SubmitTicket};

/// Shared handle to a [`ValidatedSubmitForm`].
pub struct SharedForm<H> {
    inner: Arc<Mutex<ValidatedSubmitForm<H>>>,
}

impl<H> Clone for SharedForm<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: FormHost> SharedForm<H> {
    pub fn new(form: ValidatedSubmitForm<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(form)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ValidatedSubmitForm<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the form.
    pub fn with<R>(&self, f: impl FnOnce(&mut ValidatedSubmitForm<H>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn set_field_value(&self, name: &str, value: impl Into<String>) -> bool {
        self.lock().set_field_value(name, value)
    }

    pub fn status(&self) -> FormStatus {
        self.lock().status()
    }

    pub fn submit_error(&self) -> Option<String> {
        self.lock().submit_error().map(str::to_owned)
    }

    pub fn can_submit(&self) -> bool {
        self.lock().can_submit()
    }

    pub fn dismiss_submit_error(&self) {
        self.lock().dismiss_submit_error();
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Run a whole submission. Other handles may edit or reset the form while
    /// the action is pending.
    pub async fn submit<A: SubmitAction>(&self, action: &A) -> Result<SubmitOutcome, SubmitRejected> {
        let SubmitTicket { token, values } = self.lock().begin_submit()?;
        let result = action.submit(values).await;
        Ok(self.lock().complete_submit(token, result))
    }
}
