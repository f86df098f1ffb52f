#![forbid(unsafe_code)]

//! Declarative field rules and the pure schema validation pass.

use std::collections::BTreeMap;
use std::fmt;

use super::{Required, Validator};

/// An owned snapshot of field values keyed by field name.
pub type FieldValues = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Validation messages per field.
///
/// Only fields with at least one message are present. Messages keep rule
/// order; renderers show the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    by_field: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// No errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    /// All messages for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.by_field.get(field).map(Vec::as_slice)
    }

    /// The message shown for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns `true` if `field` has an error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    /// Names of the fields with errors, in name order.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        self.by_field.keys().cloned().collect()
    }

    /// Iterate `(field, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_field
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    fn insert(&mut self, field: &str, messages: Vec<String>) {
        if !messages.is_empty() {
            self.by_field.insert(field.to_string(), messages);
        }
    }
}

impl<const N: usize> From<[(&str, &[&str]); N]> for FieldErrors {
    fn from(entries: [(&str, &[&str]); N]) -> Self {
        let mut errors = Self::new();
        for (field, messages) in entries {
            errors.insert(field, messages.iter().map(|m| (*m).to_string()).collect());
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Rules for one named field.
///
/// A required field that is empty reports only its required message. Any
/// other value runs every rule and keeps every failure, in rule order.
pub struct FieldDescriptor {
    name: String,
    required: Option<Required>,
    rules: Vec<Box<dyn Validator<str>>>,
}

impl FieldDescriptor {
    /// An optional field with no rules.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: None,
            rules: Vec::new(),
        }
    }

    /// Mark the field required, reporting `message` when empty.
    #[must_use]
    pub fn required(self, message: impl Into<String>) -> Self {
        self.required_with(Required::new().with_message(message))
    }

    /// Mark the field required with a configured [`Required`] rule.
    #[must_use]
    pub fn required_with(mut self, required: Required) -> Self {
        self.required = Some(required);
        self
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, validator: impl Validator<str> + 'static) -> Self {
        self.rules.push(Box::new(validator));
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an empty value is rejected.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Messages for `value`; empty when the value passes.
    #[must_use]
    pub fn check(&self, value: &str) -> Vec<String> {
        if let Some(required) = &self.required
            && let Some(message) = required.validate(value).error_message()
        {
            return vec![message];
        }
        self.rules
            .iter()
            .filter_map(|rule| rule.validate(value).error_message())
            .collect()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("required", &self.required.is_some())
            .field("rules", &self.rules.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ValidationSchema
// ---------------------------------------------------------------------------

/// Ordered set of field descriptors.
///
/// ```rust
/// use arema_forms::validation::{Email, FieldDescriptor, FieldValues, ValidationSchema};
///
/// let schema = ValidationSchema::new()
///     .field(FieldDescriptor::new("email").required("required").rule(Email::new("bad email")));
///
/// let mut values = FieldValues::new();
/// values.insert("email".into(), "nope".into());
/// assert_eq!(schema.validate(&values).first("email"), Some("bad email"));
/// ```
#[derive(Debug, Default)]
pub struct ValidationSchema {
    fields: Vec<FieldDescriptor>,
}

impl ValidationSchema {
    /// An empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. A descriptor with an existing name replaces the old one
    /// in place, keeping its position.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        match self
            .fields
            .iter_mut()
            .find(|existing| existing.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    /// Descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if the schema declares `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Validate every declared field. Missing values count as empty.
    #[must_use]
    pub fn validate(&self, values: &FieldValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            let value = values.get(&field.name).map_or("", String::as_str);
            errors.insert(&field.name, field.check(value));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Email, Password, Predicate};

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                FieldDescriptor::new("email")
                    .required("email required")
                    .rule(Email::new("email invalid")),
            )
            .field(
                FieldDescriptor::new("password")
                    .required("password required")
                    .rule(Password::new(8, "password invalid")),
            )
    }

    #[test]
    fn missing_values_report_required() {
        let errors = schema().validate(&FieldValues::new());
        assert_eq!(errors.first("email"), Some("email required"));
        assert_eq!(errors.first("password"), Some("password required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn required_short_circuits_rules() {
        let errors = schema().validate(&values(&[("email", ""), ("password", "Abc12345")]));
        assert_eq!(errors.get("email"), Some(&["email required".to_string()][..]));
        assert!(!errors.contains("password"));
    }

    #[test]
    fn whitespace_is_not_empty_for_required() {
        let errors = schema().validate(&values(&[("email", "   "), ("password", "   ")]));
        assert_eq!(errors.first("email"), Some("email invalid"));
        assert_eq!(errors.first("password"), Some("password invalid"));
    }

    #[test]
    fn invalid_value_reports_rule_message() {
        let errors = schema().validate(&values(&[
            ("email", "not-an-email"),
            ("password", "Abc12345"),
        ]));
        assert_eq!(errors, FieldErrors::from([("email", &["email invalid"][..])]));
    }

    #[test]
    fn all_failing_rules_are_retained() {
        let schema = ValidationSchema::new().field(
            FieldDescriptor::new("code")
                .rule(Predicate::new(|s: &str| s.len() == 4, "four chars"))
                .rule(Predicate::new(|s: &str| s.chars().all(|c| c.is_ascii_digit()), "digits")),
        );
        let errors = schema.validate(&values(&[("code", "abc")]));
        assert_eq!(
            errors.get("code"),
            Some(&["four chars".to_string(), "digits".to_string()][..])
        );
        assert_eq!(errors.first("code"), Some("four chars"));
    }

    #[test]
    fn optional_empty_field_runs_rules() {
        let schema = ValidationSchema::new()
            .field(FieldDescriptor::new("nickname").rule(Predicate::new(|s: &str| !s.is_empty(), "empty")));
        assert!(schema.validate(&FieldValues::new()).contains("nickname"));
    }

    #[test]
    fn duplicate_names_replace_in_place() {
        let schema = schema().field(FieldDescriptor::new("email"));
        assert_eq!(schema.field_names().collect::<Vec<_>>(), ["email", "password"]);
        assert!(!schema.get("email").is_some_and(FieldDescriptor::is_required));
    }

    #[test]
    fn validate_is_idempotent() {
        let schema = schema();
        let input = values(&[("email", "x@y"), ("password", "short")]);
        assert_eq!(schema.validate(&input), schema.validate(&input));
    }
}
