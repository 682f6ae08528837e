//! Contact inquiry statuses.

use crate::error::CoreError;
use crate::validation::validate_one_of;

pub const STATUS_NEW: &str = "new";
pub const STATUS_READ: &str = "read";
pub const STATUS_REPLIED: &str = "replied";
pub const STATUS_RESOLVED: &str = "resolved";

pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_READ, STATUS_REPLIED, STATUS_RESOLVED];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("inquiry status", status, VALID_STATUSES)
}
