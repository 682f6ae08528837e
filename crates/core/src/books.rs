//! Book catalogue vocabularies and copy-count rules.

use crate::error::CoreError;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// On the shelf and lendable.
pub const STATUS_AVAILABLE: &str = "available";
/// Every copy is out on loan.
pub const STATUS_BORROWED: &str = "borrowed";
/// Held for a patron.
pub const STATUS_RESERVED: &str = "reserved";
pub const STATUS_LOST: &str = "lost";
pub const STATUS_DAMAGED: &str = "damaged";

/// All valid book statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_AVAILABLE,
    STATUS_BORROWED,
    STATUS_RESERVED,
    STATUS_LOST,
    STATUS_DAMAGED,
];

// ---------------------------------------------------------------------------
// Categories and conditions
// ---------------------------------------------------------------------------

pub const CATEGORY_SCHOOL: &str = "school";
pub const CATEGORY_COMPETITIVE: &str = "competitive";
pub const CATEGORY_SKILL: &str = "skill";
pub const CATEGORY_SELF_HELP: &str = "self-help";
pub const CATEGORY_OTHER: &str = "other";

/// All valid book categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_SCHOOL,
    CATEGORY_COMPETITIVE,
    CATEGORY_SKILL,
    CATEGORY_SELF_HELP,
    CATEGORY_OTHER,
];

pub const CONDITION_NEW: &str = "new";
pub const CONDITION_GOOD: &str = "good";
pub const CONDITION_FAIR: &str = "fair";
pub const CONDITION_POOR: &str = "poor";

/// All valid physical conditions (books and donated books).
pub const VALID_CONDITIONS: &[&str] = &[CONDITION_NEW, CONDITION_GOOD, CONDITION_FAIR, CONDITION_POOR];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("book status", status, VALID_STATUSES)
}

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    validate_one_of("book category", category, VALID_CATEGORIES)
}

pub fn validate_condition(condition: &str) -> Result<(), CoreError> {
    validate_one_of("book condition", condition, VALID_CONDITIONS)
}

/// Copy counts must satisfy `1 <= total` and `0 <= available <= total`.
pub fn validate_copies(total: i32, available: i32) -> Result<(), CoreError> {
    if total < 1 {
        return Err(CoreError::Validation(
            "total_copies must be at least 1".to_string(),
        ));
    }
    if available < 0 || available > total {
        return Err(CoreError::Validation(format!(
            "available_copies must be between 0 and {total} (got {available})"
        )));
    }
    Ok(())
}

/// Status a book should carry after its available copy count changes.
///
/// Only the lending statuses move automatically; `reserved`, `lost` and
/// `damaged` are set by hand and left alone.
pub fn status_for_copies(current: &str, available: i32) -> &'static str {
    match current {
        STATUS_AVAILABLE | STATUS_BORROWED => {
            if available > 0 {
                STATUS_AVAILABLE
            } else {
                STATUS_BORROWED
            }
        }
        STATUS_RESERVED => STATUS_RESERVED,
        STATUS_LOST => STATUS_LOST,
        _ => STATUS_DAMAGED,
    }
}
