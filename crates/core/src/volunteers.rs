//! Volunteer application review statuses.

use crate::error::CoreError;
use crate::validation::validate_one_of;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("volunteer application status", status, VALID_STATUSES)
}

/// Whether moving to `status` counts as a review decision (stamps
/// `reviewed_by` / `reviewed_at`).
pub fn is_decision(status: &str) -> bool {
    status == STATUS_APPROVED || status == STATUS_REJECTED
}
