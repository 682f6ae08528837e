//! Book donation intake statuses and rules.

use crate::error::CoreError;
use crate::validation::validate_one_of;

/// Newly submitted, awaiting delivery.
pub const STATUS_PENDING: &str = "pending";
/// Books were handed over to the library.
pub const STATUS_RECEIVED: &str = "received";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_RECEIVED, STATUS_CANCELLED];

/// Largest quantity accepted in a single pledge.
pub const MAX_QUANTITY: i32 = 10_000;

/// Header row of the admin CSV export.
pub const CSV_HEADERS: &[&str] = &[
    "Donor Name",
    "Email",
    "Phone",
    "Book Title",
    "Author",
    "Category",
    "Condition",
    "Quantity",
    "Status",
    "Date",
];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("book donation status", status, VALID_STATUSES)
}

pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "quantity must be between 1 and {MAX_QUANTITY}"
        )));
    }
    Ok(())
}

/// Whether moving to `next` should stamp `received_at` / `received_by`.
pub fn stamps_receipt(next: &str) -> bool {
    next == STATUS_RECEIVED
}
