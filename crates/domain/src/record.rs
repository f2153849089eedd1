use std::collections::BTreeMap;

use chronopay_core::{AppError, AppResult};
use serde_json::{Map, Number, Value};

/// Expected textual shape of an editor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Free text.
    Text,
    /// Email address; blank optional values skip the check.
    Email,
    /// Non-negative whole number, sent to the backend as a JSON number.
    Integer,
    /// Decimal number, sent to the backend as a JSON number.
    Decimal,
}

impl FieldFormat {
    fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }
}

/// Declarative description of one record field.
///
/// Drives inbound normalization, editor validation and outbound payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical field name used throughout the client.
    pub name: &'static str,
    /// Label shown in validation messages.
    pub label: &'static str,
    /// Keys accepted in backend responses; the first non-empty one wins.
    pub wire_keys: &'static [&'static str],
    /// Key used when sending the field to the backend.
    pub payload_key: &'static str,
    /// Whether the editor requires a non-blank value.
    pub required: bool,
    /// Maximum number of characters accepted by the editor.
    pub max_length: Option<usize>,
    /// Expected value shape.
    pub format: FieldFormat,
    /// Whether the table search looks at this field.
    pub searchable: bool,
}

impl FieldSpec {
    /// Creates an optional free-text field with no length limit.
    #[must_use]
    pub const fn text(
        name: &'static str,
        label: &'static str,
        wire_keys: &'static [&'static str],
        payload_key: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            wire_keys,
            payload_key,
            required: false,
            max_length: None,
            format: FieldFormat::Text,
            searchable: false,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the value format.
    #[must_use]
    pub const fn format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    /// Includes the field in table search.
    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }
}

/// Text values of a record keyed by canonical field name.
///
/// Used both as the editor draft and as the normalized shape of a backend row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(BTreeMap<String, String>);

impl FieldValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates blank values for every declared field.
    #[must_use]
    pub fn blank(fields: &[FieldSpec]) -> Self {
        Self(
            fields
                .iter()
                .map(|field| (field.name.to_owned(), String::new()))
                .collect(),
        )
    }

    /// Normalizes one backend row.
    ///
    /// Missing text fields become empty strings and missing numeric fields
    /// become `0`.
    #[must_use]
    pub fn from_wire(fields: &[FieldSpec], row: &Map<String, Value>) -> Self {
        let mut values = Self::new();
        for field in fields {
            let value = field
                .wire_keys
                .iter()
                .filter_map(|key| row.get(*key))
                .filter_map(wire_text)
                .find(|value| !value.is_empty())
                .unwrap_or_else(|| {
                    if field.format.is_numeric() {
                        "0".to_owned()
                    } else {
                        String::new()
                    }
                });
            values.set(field.name, value);
        }

        values
    }

    /// Returns a value or an empty string when unset.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Sets a value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Builder-style [`FieldValues::set`].
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns a copy with every value trimmed.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(name, value)| (name.clone(), value.trim().to_owned()))
                .collect(),
        )
    }

    /// Builds the outbound payload using backend key names.
    ///
    /// Numeric fields are emitted as JSON numbers and fail when unparsable.
    pub fn to_payload(&self, fields: &[FieldSpec]) -> AppResult<Value> {
        let mut payload = Map::new();
        for field in fields {
            let text = self.get(field.name).trim();
            let value = match field.format {
                FieldFormat::Integer => Value::Number(Number::from(parse_integer(field, text)?)),
                FieldFormat::Decimal => {
                    let number = parse_decimal(field, text)?;
                    Number::from_f64(number)
                        .map(Value::Number)
                        .ok_or_else(|| {
                            AppError::Validation(format!("{} must be a finite number", field.label))
                        })?
                }
                FieldFormat::Text | FieldFormat::Email => Value::String(text.to_owned()),
            };
            payload.insert(field.payload_key.to_owned(), value);
        }

        Ok(Value::Object(payload))
    }
}

/// Parses a whole-number field value; blank counts as zero.
pub fn parse_integer(field: &FieldSpec, text: &str) -> AppResult<u64> {
    if text.is_empty() {
        return Ok(0);
    }

    text.parse::<u64>()
        .map_err(|_| AppError::Validation(format!("{} must be a whole number", field.label)))
}

/// Parses a decimal field value; blank counts as zero.
pub fn parse_decimal(field: &FieldSpec, text: &str) -> AppResult<f64> {
    if text.is_empty() {
        return Ok(0.0);
    }

    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", field.label)))
}

fn wire_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
