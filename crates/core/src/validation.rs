//! Field-level validation helpers shared by every entity module.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::CoreError;

/// Loose email shape check: something@something.tld, no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Maximum length for short free-text fields (names, titles).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for long free-text fields (descriptions, messages).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Reject empty or whitespace-only required fields.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject values longer than `max` characters.
pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(CoreError::Validation(format!("Invalid email address '{email}'")));
    }
    Ok(())
}

/// Normalise an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Amounts must be strictly positive.
pub fn validate_positive_amount(field: &str, amount: Decimal) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(format!("{field} must be greater than zero")));
    }
    Ok(())
}

/// Validate that `value` is one of `allowed`. `kind` names the vocabulary in
/// the error message.
pub fn validate_one_of(kind: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {kind} '{value}'. Must be one of: {allowed:?}"
        )))
    }
}

/// Derive a URL slug from a title: lowercase ASCII alphanumerics separated
/// by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
