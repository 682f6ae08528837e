//! Library desk rules: loan periods, borrowing limits and overdue fines.

use chrono::Duration;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::{Money, Timestamp};
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Issue status constants
// ---------------------------------------------------------------------------

/// The copy is out with the patron.
pub const ISSUE_ISSUED: &str = "issued";
/// The copy came back.
pub const ISSUE_RETURNED: &str = "returned";
/// Flagged overdue by staff (still out).
pub const ISSUE_OVERDUE: &str = "overdue";
/// The patron lost the copy.
pub const ISSUE_LOST: &str = "lost";

/// All valid issue statuses.
pub const VALID_ISSUE_STATUSES: &[&str] = &[ISSUE_ISSUED, ISSUE_RETURNED, ISSUE_OVERDUE, ISSUE_LOST];

// ---------------------------------------------------------------------------
// Desk policy
// ---------------------------------------------------------------------------

/// Default loan period.
pub const DEFAULT_LOAN_DAYS: i64 = 14;

/// Default number of books a patron may hold at once.
pub const DEFAULT_MAX_BOOKS: i32 = 3;

/// Fine charged per full day past the due date.
pub const FINE_PER_DAY: i64 = 5;

pub fn validate_issue_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("issue status", status, VALID_ISSUE_STATUSES)
}

/// Default due date for a loan starting at `issued_at`.
pub fn default_due_date(issued_at: Timestamp) -> Timestamp {
    issued_at + Duration::days(DEFAULT_LOAN_DAYS)
}

/// Full days between `due` and `at`; zero when not yet due.
pub fn days_overdue(due: Timestamp, at: Timestamp) -> i64 {
    (at - due).num_days().max(0)
}

/// Fine owed for a copy returned (or checked) at `at`.
pub fn compute_fine(due: Timestamp, at: Timestamp) -> Money {
    Decimal::from(days_overdue(due, at) * FINE_PER_DAY)
}

/// A patron with `active` unreturned issues may borrow only while under
/// `max_allowed`.
pub fn check_borrow_limit(active: i64, max_allowed: i32) -> Result<(), CoreError> {
    if active >= i64::from(max_allowed) {
        return Err(CoreError::Conflict(format!(
            "Patron already holds {active} book(s); the limit is {max_allowed}"
        )));
    }
    Ok(())
}

/// A due date must fall after the issue time.
pub fn validate_due_date(issued_at: Timestamp, due: Timestamp) -> Result<(), CoreError> {
    if due <= issued_at {
        return Err(CoreError::Validation(
            "due_date must be after the issue date".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32, hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn default_loan_is_two_weeks() {
        assert_eq!(default_due_date(at(1, 10)), at(15, 10));
    }

    #[test]
    fn no_fine_on_or_before_due() {
        assert_eq!(compute_fine(at(10, 12), at(9, 12)), Decimal::ZERO);
        assert_eq!(compute_fine(at(10, 12), at(10, 12)), Decimal::ZERO);
    }

    #[test]
    fn partial_days_are_not_charged() {
        // 23 hours late is not a full day.
        assert_eq!(days_overdue(at(10, 0), at(10, 23)), 0);
        assert_eq!(compute_fine(at(10, 0), at(10, 23)), Decimal::ZERO);
    }

    #[test]
    fn fine_is_five_per_full_day() {
        assert_eq!(days_overdue(at(10, 12), at(13, 13)), 3);
        assert_eq!(compute_fine(at(10, 12), at(13, 13)), Decimal::from(15));
    }

    #[test]
    fn borrow_limit() {
        assert!(check_borrow_limit(0, 3).is_ok());
        assert!(check_borrow_limit(2, 3).is_ok());
        assert!(matches!(check_borrow_limit(3, 3), Err(CoreError::Conflict(_))));
    }

    #[test]
    fn due_date_must_follow_issue() {
        assert!(validate_due_date(at(1, 0), at(2, 0)).is_ok());
        assert!(validate_due_date(at(2, 0), at(2, 0)).is_err());
    }

    #[test]
    fn issue_statuses() {
        assert!(validate_issue_status(ISSUE_RETURNED).is_ok());
        assert!(validate_issue_status("renewed").is_err());
    }
}
