#![forbid(unsafe_code)]

//! Form configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `AREMA_FORMS_PASSWORD_MIN_LEN` | 8 |
//! | `AREMA_FORMS_TRIM_REQUIRED` | false |
//! | `AREMA_FORMS_TRACE_CAPACITY` | 256 |
//!
//! Parsing fails open: an unparsable value keeps the default and logs a
//! warning.

use crate::submit::DEFAULT_TRACE_CAPACITY;
use crate::validation::DEFAULT_PASSWORD_MIN_LEN;

pub const ENV_PASSWORD_MIN_LEN: &str = "AREMA_FORMS_PASSWORD_MIN_LEN";
pub const ENV_TRIM_REQUIRED: &str = "AREMA_FORMS_TRIM_REQUIRED";
pub const ENV_TRACE_CAPACITY: &str = "AREMA_FORMS_TRACE_CAPACITY";

/// Tunables shared by every form built from this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormConfig {
    /// Minimum password length in characters.
    pub password_min_len: usize,
    /// Whether a whitespace-only value counts as empty for a required field.
    pub trim_required: bool,
    /// Number of submission events kept per form.
    pub trace_capacity: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            password_min_len: DEFAULT_PASSWORD_MIN_LEN,
            trim_required: false,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

impl FormConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            password_min_len: env_usize(&lookup, ENV_PASSWORD_MIN_LEN)
                .filter(|&len| len > 0)
                .unwrap_or(defaults.password_min_len),
            trim_required: env_flag(&lookup, ENV_TRIM_REQUIRED)
                .unwrap_or(defaults.trim_required),
            trace_capacity: env_usize(&lookup, ENV_TRACE_CAPACITY)
                .unwrap_or(defaults.trace_capacity),
        };
        tracing::debug!(?config, "form config loaded");
        config
    }
}

fn env_flag(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    let value = lookup(name)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if matches!(
        trimmed,
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON"
    ) {
        Some(true)
    } else if matches!(
        trimmed,
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF"
    ) {
        Some(false)
    } else {
        tracing::warn!(var = name, value = trimmed, "invalid flag, using default");
        None
    }
}

fn env_usize(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<usize> {
    let value = lookup(name)?;
    match value.trim().parse::<usize>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(var = name, value = %value, error = %err, "invalid number, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(FormConfig::from_lookup(lookup(&[])), FormConfig::default());
    }

    #[test]
    fn parses_all_vars() {
        let config = FormConfig::from_lookup(lookup(&[
            (ENV_PASSWORD_MIN_LEN, "12"),
            (ENV_TRIM_REQUIRED, "yes"),
            (ENV_TRACE_CAPACITY, " 16 "),
        ]));
        assert_eq!(
            config,
            FormConfig {
                password_min_len: 12,
                trim_required: true,
                trace_capacity: 16,
            }
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = FormConfig::from_lookup(lookup(&[
            (ENV_PASSWORD_MIN_LEN, "eight"),
            (ENV_TRIM_REQUIRED, "maybe"),
            (ENV_TRACE_CAPACITY, "-1"),
        ]));
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn zero_min_len_is_rejected() {
        let config = FormConfig::from_lookup(lookup(&[(ENV_PASSWORD_MIN_LEN, "0")]));
        assert_eq!(config.password_min_len, DEFAULT_PASSWORD_MIN_LEN);
    }

    #[test]
    fn zero_trace_capacity_is_allowed() {
        let config = FormConfig::from_lookup(lookup(&[(ENV_TRACE_CAPACITY, "0")]));
        assert_eq!(config.trace_capacity, 0);
    }
}
