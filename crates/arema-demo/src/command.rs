#![forbid(unsafe_code)]

//! Line commands accepted by the demo.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    SignIn,
    Email(String),
    Password(String),
    Submit,
    Dismiss,
    Show,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty command"),
            Self::Unknown(word) => write!(f, "unknown command: {word} (try `help`)"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
commands:
  open              open the sign-up dialog
  close             close it
  signin            follow the sign-in link
  email <value>     set the email field (empty value clears it)
  password <value>  set the password field
  submit            create the account
  dismiss           hide the error banner
  show              print the dialog
  json              print the dialog as JSON
  help              this text
  quit              exit";

impl Command {
    /// Parse one input line. Field values keep inner spaces.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_end_matches(['\r', '\n'])),
            None => (line.trim_end(), ""),
        };
        match word {
            "" => Err(CommandError::Empty),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "signin" => Ok(Self::SignIn),
            "email" => Ok(Self::Email(rest.to_string())),
            "password" => Ok(Self::Password(rest.to_string())),
            "submit" => Ok(Self::Submit),
            "dismiss" => Ok(Self::Dismiss),
            "show" => Ok(Self::Show),
            "json" => Ok(Self::Json),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
