#![forbid(unsafe_code)]

//! Console driver for the sign-up dialog.
//!
//! Reads one command per line from stdin and prints the dialog after every
//! change, against an in-memory account store.
//!
//! # Running
//!
//! ```sh
//! AREMA_LOG=debug cargo run -p arema-demo
//! ```
//!
//! Form tunables come from `AREMA_FORMS_*` (see `arema_forms::config`).

mod backend;
mod command;

use std::io::{self, BufRead, Write};

use arema_forms::dialog::{InputKind, SignUpView};
use arema_forms::{FormConfig, FormHost, SignUpDialog, SignUpMessages};
use tracing_subscriber::EnvFilter;

use crate::backend::InMemoryAuth;
use crate::command::{Command, HELP};

const LOG_ENV: &str = "AREMA_LOG";

/// Host that reports callbacks on stdout.
struct ConsoleHost;

impl FormHost for ConsoleHost {
    fn notify_success(&mut self, message: &str) {
        println!("[notice] {message}");
    }

    fn close(&mut self) {
        println!("[dialog closed]");
    }

    fn open_alternate(&mut self) {
        println!("[switching to sign-in]");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn render(view: &SignUpView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "[logo {} {}x{}]\n== {} ==\n",
        view.logo.src, view.logo.width, view.logo.height, view.title
    ));
    for field in &view.fields {
        let shown = match field.kind {
            InputKind::Password => "*".repeat(field.value.chars().count()),
            InputKind::Email => field.value.clone(),
        };
        let shown = if shown.is_empty() {
            format!("({})", field.placeholder)
        } else {
            shown
        };
        out.push_str(&format!("{}: {shown}", field.label));
        if let Some(error) = &field.error {
            out.push_str(&format!("  ! {error}"));
        }
        out.push('\n');
    }
    if let Some(banner) = &view.submit_error {
        out.push_str(&format!("[error] {banner}\n"));
    }
    let state = if view.submitting {
        " (submitting)"
    } else if view.submit_disabled {
        " (disabled)"
    } else {
        ""
    };
    out.push_str(&format!("[{}]{state}\n", view.submit_label));
    out.push_str(&format!("> {}\n", view.switch_label));
    out
}

fn show(dialog: &SignUpDialog<ConsoleHost>) {
    match dialog.view() {
        Some(view) => print!("{}", render(&view)),
        None => println!("(dialog closed; `open` to show it)"),
    }
}

fn main() -> io::Result<()> {
    init_tracing();
    let config = FormConfig::from_env();
    let auth = InMemoryAuth::default();
    let mut dialog = SignUpDialog::new(&config, SignUpMessages::default(), ConsoleHost);
    dialog.open();
    show(&dialog);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        match command {
            Command::Open => dialog.open(),
            Command::Close => dialog.close(),
            Command::SignIn => dialog.open_sign_in(),
            Command::Email(value) => dialog.set_email(value),
            Command::Password(value) => dialog.set_password(value),
            Command::Submit => match pollster::block_on(dialog.submit(&auth)) {
                Ok(outcome) => tracing::debug!(?outcome, accounts = auth.account_count(), "submit finished"),
                Err(rejected) => println!("(not submitted: {rejected})"),
            },
            Command::Dismiss => dialog.dismiss_error(),
            Command::Show => {}
            Command::Json => {
                match dialog.view().map(|view| serde_json::to_string_pretty(&view)) {
                    Some(Ok(json)) => println!("{json}"),
                    Some(Err(err)) => eprintln!("serialize failed: {err}"),
                    None => println!("null"),
                }
                continue;
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }
        show(&dialog);
        stdout.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_masks_password_and_shows_errors() {
        let mut dialog =
            SignUpDialog::new(&FormConfig::default(), SignUpMessages::default(), ConsoleHost);
        dialog.open();
        dialog.set_email("nope");
        dialog.set_password("abc");
        let text = render(&dialog.view().expect("open"));
        assert!(text.contains("== 会員登録 =="));
        assert!(text.contains("メールアドレス: nope  ! メールアドレスが正しくありません"));
        assert!(text.contains("パスワード: ***  ! パスワードが正しくありません"));
        assert!(text.contains("[アカウント作成] (disabled)"));
    }

    #[test]
    fn render_shows_placeholders_when_empty() {
        let mut dialog =
            SignUpDialog::new(&FormConfig::default(), SignUpMessages::default(), ConsoleHost);
        dialog.open();
        let text = render(&dialog.view().expect("open"));
        assert!(text.contains("メールアドレス: (メールアドレスを入力)\n"));
    }
}
