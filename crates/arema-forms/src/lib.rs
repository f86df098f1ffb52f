#![forbid(unsafe_code)]

//! Validated submit forms for the AREMA client.
//!
//! # Role in AREMA
//! `arema-forms` holds the UI-independent model behind the account dialogs:
//! field values, schema validation, one asynchronous submission at a time and
//! the render-ready view of the sign-up dialog. Front ends feed it edits and
//! draw the [`dialog::SignUpView`] it produces.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`validation`] | Validators, field descriptors and schemas |
//! | [`state`] | `FormState` and its pure reducer |
//! | [`submit`] | Submit action contract, failures, tokens and trace |
//! | [`form`] | `ValidatedSubmitForm` and the `FormHost` callbacks |
//! | [`shared`] | `SharedForm`, a cloneable handle for concurrent use |
//! | [`dialog`] | The sign-up dialog model |
//! | [`timetable`] | Timetable channel header cell |
//! | [`config`] | Environment-driven `FormConfig` |
//!
//! # Features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `serde` | `Serialize` for view snapshots |

pub mod config;
pub mod dialog;
pub mod form;
pub mod shared;
pub mod state;
pub mod submit;
pub mod timetable;
pub mod validation;

pub use config::FormConfig;
pub use dialog::{SignUpDialog, SignUpMessages, SignUpView};
pub use form::{FormHost, ValidatedSubmitForm};
pub use shared::SharedForm;
pub use state::{FormAction, FormState, FormStatus};
pub use submit::{
    SubmissionError, SubmitAction, SubmitFailure, SubmitMessages, SubmitOutcome, SubmitRejected,
    SubmitTicket, SubmitToken, submit_fn,
};
pub use validation::{FieldDescriptor, FieldErrors, FieldValues, ValidationSchema};
