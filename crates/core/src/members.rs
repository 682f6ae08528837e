//! Organisation member directory types.

use crate::error::CoreError;
use crate::validation::validate_one_of;

pub const TYPE_VOLUNTEER: &str = "volunteer";
pub const TYPE_DONOR: &str = "donor";
pub const TYPE_MENTOR: &str = "mentor";
pub const TYPE_STUDENT: &str = "student";

pub const VALID_TYPES: &[&str] = &[TYPE_VOLUNTEER, TYPE_DONOR, TYPE_MENTOR, TYPE_STUDENT];

pub fn validate_type(member_type: &str) -> Result<(), CoreError> {
    validate_one_of("member type", member_type, VALID_TYPES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_types() {
        assert!(validate_type(TYPE_MENTOR).is_ok());
        assert!(validate_type("sponsor").is_err());
    }
}
