//! Editor validation rules.
//!
//! Checks run in a fixed order and stop at the first failure: required
//! fields, length limits, duplicate codes, then value formats.

use std::sync::LazyLock;

use chronopay_core::{AppError, AppResult};
use regex::Regex;

use crate::record::{FieldFormat, FieldSpec, FieldValues, parse_decimal, parse_integer};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// Returns whether `value` looks like an email address.
///
/// Accepts `local@domain.tld` where no part contains whitespace or `@`.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

/// Fails when any required field is blank after trimming.
pub fn require_fields(fields: &[FieldSpec], values: &FieldValues) -> AppResult<()> {
    match fields
        .iter()
        .find(|field| field.required && values.get(field.name).trim().is_empty())
    {
        Some(field) => Err(AppError::Validation(format!("{} is required.", field.label))),
        None => Ok(()),
    }
}

/// Fails when any field exceeds its maximum character length.
pub fn enforce_max_lengths(fields: &[FieldSpec], values: &FieldValues) -> AppResult<()> {
    for field in fields {
        if let Some(max_length) = field.max_length
            && values.get(field.name).trim().chars().count() > max_length
        {
            return Err(AppError::Validation(format!(
                "{} must not exceed {max_length} characters.",
                field.label
            )));
        }
    }

    Ok(())
}

/// Fails when `code` matches an existing code, ignoring case.
///
/// `existing` yields `(record key, code)` pairs; the pair whose key equals
/// `editing_key` is the record being edited and is skipped.
pub fn ensure_unique_code<'a>(
    label: &str,
    code: &str,
    existing: impl IntoIterator<Item = (String, &'a str)>,
    editing_key: Option<&str>,
) -> AppResult<()> {
    let candidate = code.trim().to_lowercase();
    let duplicate = existing.into_iter().any(|(key, existing_code)| {
        editing_key != Some(key.as_str()) && existing_code.trim().to_lowercase() == candidate
    });

    if duplicate {
        return Err(AppError::Conflict(format!(
            "{label} '{}' already exists.",
            code.trim()
        )));
    }

    Ok(())
}

/// Fails when a non-blank value does not match its declared format.
pub fn check_formats(fields: &[FieldSpec], values: &FieldValues) -> AppResult<()> {
    for field in fields {
        let value = values.get(field.name).trim();
        match field.format {
            FieldFormat::Text => {}
            FieldFormat::Email => {
                if !value.is_empty() && !is_valid_email(value) {
                    return Err(AppError::Validation(format!(
                        "{} must be a valid email address.",
                        field.label
                    )));
                }
            }
            FieldFormat::Integer => {
                parse_integer(field, value)?;
            }
            FieldFormat::Decimal => {
                parse_decimal(field, value)?;
            }
        }
    }

    Ok(())
}

/// Runs every editor check in order.
pub fn validate_draft<'a>(
    fields: &[FieldSpec],
    values: &FieldValues,
    existing: impl IntoIterator<Item = (String, &'a str)>,
    editing_key: Option<&str>,
) -> AppResult<()> {
    require_fields(fields, values)?;
    enforce_max_lengths(fields, values)?;
    if let Some(code_field) = fields.iter().find(|field| field.name == "code") {
        ensure_unique_code(
            code_field.label,
            values.get(code_field.name),
            existing,
            editing_key,
        )?;
    }
    check_formats(fields, values)
}
