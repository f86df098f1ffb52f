#![forbid(unsafe_code)]

//! The sign-up dialog: an email/password [`ValidatedSubmitForm`] plus the
//! texts and layout data needed to render it.
//!
//! The dialog owns no rendering. [`SignUpDialog::view`] produces a
//! [`SignUpView`] snapshot that a front end draws as-is.

use tracing::debug;

use crate::config::FormConfig;
use crate::form::{FormHost, ValidatedSubmitForm};
use crate::state::FormStatus;
use crate::submit::{
    SubmitAction, SubmitFailure, SubmitMessages, SubmitOutcome, SubmitRejected, SubmitTicket,
    SubmitToken,
};
use crate::validation::{Email, FieldDescriptor, Password, Required, ValidationSchema};

pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

pub const LOGO_SRC: &str = "/public/arema.svg";
pub const LOGO_WIDTH: u32 = 98;
pub const LOGO_HEIGHT: u32 = 36;

/// Every user-facing text of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpMessages {
    pub title: String,
    pub email_label: String,
    pub email_placeholder: String,
    pub email_required: String,
    pub email_invalid: String,
    pub password_label: String,
    pub password_placeholder: String,
    pub password_required: String,
    pub password_invalid: String,
    pub submit_label: String,
    pub switch_to_sign_in: String,
    pub submit: SubmitMessages,
}

impl Default for SignUpMessages {
    fn default() -> Self {
        Self {
            title: "会員登録".into(),
            email_label: "メールアドレス".into(),
            email_placeholder: "メールアドレスを入力".into(),
            email_required: "メールアドレスを入力してください".into(),
            email_invalid: "メールアドレスが正しくありません".into(),
            password_label: "パスワード".into(),
            password_placeholder: "パスワードを入力".into(),
            password_required: "パスワードを入力してください".into(),
            password_invalid: "パスワードが正しくありません".into(),
            submit_label: "アカウント作成".into(),
            switch_to_sign_in: "既にあるアカウントにログインする".into(),
            submit: SubmitMessages::default(),
        }
    }
}

/// The sign-up schema: both fields required, then checked for syntax.
pub fn sign_up_schema(config: &FormConfig, messages: &SignUpMessages) -> ValidationSchema {
    let required = |message: &str| {
        Required::new()
            .trim(config.trim_required)
            .with_message(message)
    };
    ValidationSchema::new()
        .field(
            FieldDescriptor::new(EMAIL_FIELD)
                .required_with(required(&messages.email_required))
                .rule(Email::new(messages.email_invalid.clone())),
        )
        .field(
            FieldDescriptor::new(PASSWORD_FIELD)
                .required_with(required(&messages.password_required))
                .rule(Password::new(
                    config.password_min_len,
                    messages.password_invalid.clone(),
                )),
        )
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InputKind {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldView {
    pub name: &'static str,
    pub label: String,
    pub placeholder: String,
    pub kind: InputKind,
    pub value: String,
    /// First error, only once the field has been modified.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LogoView {
    pub src: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Render-ready snapshot of an open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignUpView {
    pub logo: LogoView,
    pub title: String,
    pub fields: Vec<FieldView>,
    pub submit_error: Option<String>,
    pub submit_label: String,
    pub submit_disabled: bool,
    pub submitting: bool,
    pub switch_label: String,
}

// ---------------------------------------------------------------------------
// SignUpDialog
// ---------------------------------------------------------------------------

/// Sign-up dialog state. Starts closed.
pub struct SignUpDialog<H> {
    form: ValidatedSubmitForm<H>,
    messages: SignUpMessages,
    open: bool,
}

impl<H: FormHost> SignUpDialog<H> {
    pub fn new(config: &FormConfig, messages: SignUpMessages, host: H) -> Self {
        let schema = sign_up_schema(config, &messages);
        let form = ValidatedSubmitForm::new(schema, messages.submit.clone(), host)
            .with_trace_capacity(config.trace_capacity);
        Self {
            form,
            messages,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open with a fresh form.
    pub fn open(&mut self) {
        self.form.reset();
        self.open = true;
        debug!("sign-up dialog opened");
    }

    /// Close and reset. A pending submission's result will be ignored.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.form.reset();
        self.form.host_mut().close();
        debug!("sign-up dialog closed");
    }

    /// Follow the "already have an account" link.
    pub fn open_sign_in(&mut self) {
        self.form.host_mut().open_alternate();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.set_field_value(EMAIL_FIELD, value);
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.set_field_value(PASSWORD_FIELD, value);
    }

    /// Edit a field. Ignored while closed.
    pub fn set_field_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.open {
            debug!(field = name, "ignoring edit on closed dialog");
            return false;
        }
        self.form.set_field_value(name, value)
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        if !self.open {
            return Err(SubmitRejected::Closed);
        }
        self.form.begin_submit()
    }

    /// Apply a submission result. On success the dialog closes and resets.
    pub fn complete_submit(
        &mut self,
        token: SubmitToken,
        result: Result<(), SubmitFailure>,
    ) -> SubmitOutcome {
        let outcome = self.form.complete_submit(token, result);
        if outcome == SubmitOutcome::Succeeded {
            // The host was already closed by the form.
            self.open = false;
            self.form.reset();
        }
        outcome
    }

    pub async fn submit<A: SubmitAction>(
        &mut self,
        action: &A,
    ) -> Result<SubmitOutcome, SubmitRejected> {
        let SubmitTicket { token, values } = self.begin_submit()?;
        let result = action.submit(values).await;
        Ok(self.complete_submit(token, result))
    }

    pub fn dismiss_error(&mut self) {
        self.form.dismiss_submit_error();
    }

    pub fn form(&self) -> &ValidatedSubmitForm<H> {
        &self.form
    }

    pub fn host(&self) -> &H {
        self.form.host()
    }

    pub fn messages(&self) -> &SignUpMessages {
        &self.messages
    }

    /// Snapshot for rendering; `None` while closed.
    pub fn view(&self) -> Option<SignUpView> {
        if !self.open {
            return None;
        }
        let m = &self.messages;
        let submitting = self.form.status() == FormStatus::Submitting;
        Some(SignUpView {
            logo: LogoView {
                src: LOGO_SRC,
                width: LOGO_WIDTH,
                height: LOGO_HEIGHT,
            },
            title: m.title.clone(),
            fields: vec![
                self.field_view(EMAIL_FIELD, &m.email_label, &m.email_placeholder, InputKind::Email),
                self.field_view(
                    PASSWORD_FIELD,
                    &m.password_label,
                    &m.password_placeholder,
                    InputKind::Password,
                ),
            ],
            submit_error: self.form.submit_error().map(str::to_owned),
            submit_label: m.submit_label.clone(),
            submit_disabled: submitting || self.form.has_validation_errors(),
            submitting,
            switch_label: m.switch_to_sign_in.clone(),
        })
    }

    fn field_view(
        &self,
        name: &'static str,
        label: &str,
        placeholder: &str,
        kind: InputKind,
    ) -> FieldView {
        FieldView {
            name,
            label: label.to_owned(),
            placeholder: placeholder.to_owned(),
            kind,
            value: self.form.state().value(name).unwrap_or_default().to_owned(),
            error: self.form.visible_error(name).map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::tests::RecordingHost;
    use crate::submit::submit_fn;
    use crate::validation::FieldValues;
    use pollster::block_on;

    fn dialog() -> SignUpDialog<RecordingHost> {
        let mut dialog = SignUpDialog::new(
            &FormConfig::default(),
            SignUpMessages::default(),
            RecordingHost::default(),
        );
        dialog.open();
        dialog
    }

    #[test]
    fn closed_dialog_has_no_view_and_rejects_submit() {
        let mut dialog =
            SignUpDialog::new(&FormConfig::default(), SignUpMessages::default(), RecordingHost::default());
        assert!(!dialog.is_open());
        assert!(dialog.view().is_none());
        assert_eq!(dialog.begin_submit(), Err(SubmitRejected::Closed));
    }

    #[test]
    fn fresh_view_matches_layout() {
        let view = dialog().view().expect("open");
        assert_eq!(view.title, "会員登録");
        assert_eq!(
            view.logo,
            LogoView {
                src: "/public/arema.svg",
                width: 98,
                height: 36
            }
        );
        assert_eq!(view.fields.len(), 2);
        assert_eq!(view.fields[0].label, "メールアドレス");
        assert_eq!(view.fields[0].placeholder, "メールアドレスを入力");
        assert_eq!(view.fields[0].kind, InputKind::Email);
        assert_eq!(view.fields[1].label, "パスワード");
        assert_eq!(view.fields[1].kind, InputKind::Password);
        assert!(view.fields.iter().all(|f| f.error.is_none()));
        assert_eq!(view.submit_label, "アカウント作成");
        assert!(view.submit_disabled);
        assert_eq!(view.switch_label, "既にあるアカウントにログインする");
    }

    #[test]
    fn errors_show_only_for_modified_fields() {
        let mut dialog = dialog();
        dialog.set_email("nope");
        let view = dialog.view().expect("open");
        assert_eq!(
            view.fields[0].error.as_deref(),
            Some("メールアドレスが正しくありません")
        );
        assert_eq!(view.fields[1].error, None);

        dialog.set_password("short");
        let view = dialog.view().expect("open");
        assert_eq!(view.fields[1].error.as_deref(), Some("パスワードが正しくありません"));

        dialog.set_password("");
        let view = dialog.view().expect("open");
        assert_eq!(view.fields[1].error.as_deref(), Some("パスワードを入力してください"));
    }

    #[test]
    fn success_notifies_closes_and_resets() {
        let mut dialog = dialog();
        dialog.set_email("a@b.com");
        dialog.set_password("Abc12345");
        assert!(!dialog.view().expect("open").submit_disabled);

        let outcome = block_on(dialog.submit(&submit_fn(|_| async { Ok(()) })));
        assert_eq!(outcome, Ok(SubmitOutcome::Succeeded));
        assert!(!dialog.is_open());
        assert_eq!(dialog.host().calls, ["notify:新規会員登録に成功しました", "close"]);

        dialog.open();
        assert_eq!(dialog.form().state().value(EMAIL_FIELD), Some(""));
    }

    #[test]
    fn failure_banner_is_rendered_and_dismissible() {
        let mut dialog = dialog();
        dialog.set_email("a@b.com");
        dialog.set_password("Abc12345");
        let outcome = block_on(dialog.submit(&submit_fn(|_| async {
            Err(SubmitFailure::with_status(400, "exists"))
        })));
        assert!(matches!(outcome, Ok(SubmitOutcome::Failed(_))));
        let view = dialog.view().expect("still open");
        assert_eq!(view.submit_error.as_deref(), Some("入力した情報が正しくありません"));
        assert!(!view.submit_disabled);

        dialog.dismiss_error();
        assert_eq!(dialog.view().expect("open").submit_error, None);
    }

    #[test]
    fn close_during_flight_ignores_result() {
        let mut dialog = dialog();
        dialog.set_email("a@b.com");
        dialog.set_password("Abc12345");
        let ticket = dialog.begin_submit().expect("starts");
        assert!(dialog.view().expect("open").submitting);
        assert!(dialog.view().expect("open").submit_disabled);

        dialog.close();
        assert_eq!(dialog.complete_submit(ticket.token, Ok(())), SubmitOutcome::Discarded);
        assert_eq!(dialog.host().calls, ["close"]);
        assert!(!dialog.is_open());
    }

    #[test]
    fn switch_link_opens_alternate() {
        let mut dialog = dialog();
        dialog.open_sign_in();
        assert_eq!(dialog.host().calls, ["alternate"]);
    }

    #[test]
    fn edits_while_closed_are_ignored() {
        let mut dialog = dialog();
        dialog.close();
        assert!(!dialog.set_field_value(EMAIL_FIELD, "a@b.com"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn view_serializes_for_front_ends() {
        let mut dialog = dialog();
        dialog.set_email("nope");
        let json = serde_json::to_value(dialog.view().expect("open")).expect("serializes");
        assert_eq!(json["title"], "会員登録");
        assert_eq!(json["fields"][0]["kind"], "Email");
        assert_eq!(json["fields"][0]["error"], "メールアドレスが正しくありません");
        assert_eq!(json["fields"][1]["error"], serde_json::Value::Null);
    }

    #[test]
    fn whitespace_only_values_get_rule_messages() {
        let schema = sign_up_schema(&FormConfig::default(), &SignUpMessages::default());
        let values: FieldValues = [
            (EMAIL_FIELD.to_string(), "   ".to_string()),
            (PASSWORD_FIELD.to_string(), "   ".to_string()),
        ]
        .into_iter()
        .collect();
        let errors = schema.validate(&values);
        assert_eq!(errors.first(EMAIL_FIELD), Some("メールアドレスが正しくありません"));
        assert_eq!(errors.first(PASSWORD_FIELD), Some("パスワードが正しくありません"));
    }

    #[test]
    fn trim_config_treats_whitespace_as_empty() {
        let config = FormConfig {
            trim_required: true,
            ..FormConfig::default()
        };
        let schema = sign_up_schema(&config, &SignUpMessages::default());
        let values: FieldValues = [(EMAIL_FIELD.to_string(), "   ".to_string())]
            .into_iter()
            .collect();
        assert_eq!(
            schema.validate(&values).first(EMAIL_FIELD),
            Some("メールアドレスを入力してください")
        );
    }

    #[test]
    fn padded_email_is_rejected() {
        let mut dialog = dialog();
        dialog.set_email(" a@b.com ");
        dialog.set_password("Abc12345");
        assert!(!dialog.form().can_submit());
        assert_eq!(
            dialog.view().expect("open").fields[0].error.as_deref(),
            Some("メールアドレスが正しくありません")
        );
    }

    #[test]
    fn config_controls_password_policy() {
        let config = FormConfig {
            password_min_len: 4,
            ..FormConfig::default()
        };
        let mut dialog = SignUpDialog::new(&config, SignUpMessages::default(), RecordingHost::default());
        dialog.open();
        dialog.set_email("a@b.com");
        dialog.set_password("ab12");
        assert!(dialog.form().can_submit());
    }
}
