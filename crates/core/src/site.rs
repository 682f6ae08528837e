//! Public site content: settings keys, testimonials, homepage stats.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static SETTING_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_.]{0,63}$").expect("valid setting key regex"));

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Setting keys are lowercase dotted identifiers, e.g. `contact.email`.
pub fn validate_setting_key(key: &str) -> Result<(), CoreError> {
    if !SETTING_KEY_RE.is_match(key) {
        return Err(CoreError::Validation(format!(
            "Invalid setting key '{key}'. Use lowercase letters, digits, '_' and '.'"
        )));
    }
    Ok(())
}

pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}
