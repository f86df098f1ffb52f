#![forbid(unsafe_code)]

//! In-memory account store standing in for the sign-up endpoint.

use std::cell::RefCell;
use std::collections::BTreeSet;

use arema_forms::dialog::{EMAIL_FIELD, PASSWORD_FIELD};
use arema_forms::validation::FieldValues;
use arema_forms::{SubmitAction, SubmitFailure};

/// Emails under this domain simulate a transport failure (no status code).
pub const UNREACHABLE_DOMAIN: &str = "@unreachable.test";

#[derive(Debug, Default)]
pub struct InMemoryAuth {
    accounts: RefCell<BTreeSet<String>>,
}

impl InMemoryAuth {
    pub fn account_count(&self) -> usize {
        self.accounts.borrow().len()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl SubmitAction for InMemoryAuth {
    async fn submit(&self, values: FieldValues) -> Result<(), SubmitFailure> {
        let email = values
            .get(EMAIL_FIELD)
            .map(String::as_str)
            .map(normalize)
            .unwrap_or_default();
        if email.ends_with(UNREACHABLE_DOMAIN) {
            return Err(SubmitFailure::new("connection reset by peer"));
        }
        if values.get(PASSWORD_FIELD).is_none_or(String::is_empty) {
            return Err(SubmitFailure::with_status(400, "password missing"));
        }
        if !self.accounts.borrow_mut().insert(email.clone()) {
            return Err(SubmitFailure::with_status(400, format!("{email} already registered")));
        }
        tracing::info!(%email, "account created");
        Ok(())
    }
}
