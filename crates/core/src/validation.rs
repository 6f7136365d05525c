//! Field-level validation of JSON payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field errors with a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Human label for a field: `user_id` becomes `user id`.
pub(crate) fn label(field: &str) -> String {
    field.replace('_', " ")
}

pub(crate) fn required_message(field: &str) -> String {
    format!("The {} field is required.", label(field))
}

pub(crate) fn invalid_selection_message(field: &str) -> String {
    format!("The selected {} is invalid.", label(field))
}

/// Read-only view over a JSON object payload that records problems as it goes.
pub(crate) struct Payload<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Payload<'a> {
    /// Wrap a payload; non-object values are reported under `body`.
    pub fn new(value: &'a Value, errors: &mut FieldErrors) -> Self {
        match value.as_object() {
            Some(fields) => Self {
                fields: Some(fields),
            },
            None => {
                errors.add("body", "The request body must be a JSON object.");
                Self { fields: None }
            }
        }
    }

    /// The field value, treating JSON `null` as absent.
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(field))
            .filter(|value| !value.is_null())
    }

    /// A required integer. Integral numbers and numeric strings are accepted.
    pub fn required_integer(&self, field: &str, errors: &mut FieldErrors) -> Option<i64> {
        let Some(value) = self.get(field) else {
            if self.fields.is_some() {
                errors.add(field, required_message(field));
            }
            return None;
        };

        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) if s.trim().is_empty() => {
                errors.add(field, required_message(field));
                return None;
            }
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        if parsed.is_none() {
            errors.add(
                field,
                format!("The {} field must be an integer.", label(field)),
            );
        }
        parsed
    }

    /// A required, non-blank string of at most `max_chars` characters (when given).
    pub fn required_string(
        &self,
        field: &str,
        max_chars: Option<usize>,
        errors: &mut FieldErrors,
    ) -> Option<String> {
        let Some(value) = self.get(field) else {
            if self.fields.is_some() {
                errors.add(field, required_message(field));
            }
            return None;
        };

        let Value::String(s) = value else {
            errors.add(field, format!("The {} field must be a string.", label(field)));
            return None;
        };

        if s.trim().is_empty() {
            errors.add(field, required_message(field));
            return None;
        }

        if let Some(max) = max_chars {
            if s.chars().count() > max {
                errors.add(
                    field,
                    format!(
                        "The {} field must not be greater than {} characters.",
                        label(field),
                        max
                    ),
                );
                return None;
            }
        }

        Some(s.clone())
    }
}
