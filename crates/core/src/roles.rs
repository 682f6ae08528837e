//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `profiles.role`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
pub const ROLE_LIBRARIAN: &str = "librarian";

/// All assignable roles.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER, ROLE_LIBRARIAN];

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}

/// Whether the role may use the library desk (issue, return, patrons).
pub fn can_manage_library(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_LIBRARIAN
}
