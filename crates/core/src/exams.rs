//! Government exam listings: status vocabulary and date-based inference.
//!
//! Exams are ingested from external scrapers and edited by admins. Their
//! status is derived from the application window relative to today, and is
//! recomputed periodically so listings close on their own.

use crate::error::CoreError;
use crate::types::Date;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Application window is currently open.
pub const STATUS_OPEN: &str = "Open";
/// Application window has passed.
pub const STATUS_CLOSED: &str = "Closed";
/// Application window has not started yet.
pub const STATUS_COMING_SOON: &str = "Coming Soon";

pub const VALID_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_CLOSED, STATUS_COMING_SOON];

pub const LEVEL_CENTRAL: &str = "Central";
pub const LEVEL_STATE: &str = "State";

/// Level assumed when a scraper omits it.
pub const DEFAULT_LEVEL: &str = LEVEL_CENTRAL;

pub const VALID_LEVELS: &[&str] = &[LEVEL_CENTRAL, LEVEL_STATE];

pub const REMINDER_DEADLINE: &str = "deadline";
pub const REMINDER_EXAM_DATE: &str = "exam_date";
pub const REMINDER_ADMIT_CARD: &str = "admit_card";

pub const VALID_REMINDER_TYPES: &[&str] =
    &[REMINDER_DEADLINE, REMINDER_EXAM_DATE, REMINDER_ADMIT_CARD];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("exam status", status, VALID_STATUSES)
}

pub fn validate_level(level: &str) -> Result<(), CoreError> {
    validate_one_of("exam level", level, VALID_LEVELS)
}

pub fn validate_reminder_type(reminder_type: &str) -> Result<(), CoreError> {
    validate_one_of("reminder type", reminder_type, VALID_REMINDER_TYPES)
}

// ---------------------------------------------------------------------------
// Status inference
// ---------------------------------------------------------------------------

/// Infer an exam's status from its application window.
///
/// - last date before today: `Closed`
/// - start date after today: `Coming Soon`
/// - otherwise: `Open` (including when no dates are known)
pub fn infer_status(
    application_start: Option<Date>,
    application_last: Option<Date>,
    today: Date,
) -> &'static str {
    if application_last.is_some_and(|last| last < today) {
        return STATUS_CLOSED;
    }
    if application_start.is_some_and(|start| start > today) {
        return STATUS_COMING_SOON;
    }
    STATUS_OPEN
}

/// The application window must not end before it starts.
pub fn validate_window(start: Option<Date>, last: Option<Date>) -> Result<(), CoreError> {
    if let (Some(start), Some(last)) = (start, last) {
        if last < start {
            return Err(CoreError::Validation(
                "application_last_date must not be before application_start_date".to_string(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> Date {
        Date::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn past_deadline_is_closed() {
        assert_eq!(infer_status(Some(d(1, 1)), Some(d(1, 31)), d(2, 1)), STATUS_CLOSED);
    }

    #[test]
    fn deadline_today_is_still_open() {
        assert_eq!(infer_status(Some(d(1, 1)), Some(d(2, 1)), d(2, 1)), STATUS_OPEN);
    }

    #[test]
    fn future_start_is_coming_soon() {
        assert_eq!(infer_status(Some(d(3, 1)), Some(d(3, 31)), d(2, 1)), STATUS_COMING_SOON);
        assert_eq!(infer_status(Some(d(3, 1)), None, d(2, 1)), STATUS_COMING_SOON);
    }

    #[test]
    fn missing_dates_default_to_open() {
        assert_eq!(infer_status(None, None, d(2, 1)), STATUS_OPEN);
    }

    #[test]
    fn closed_wins_over_coming_soon() {
        // Inconsistent window: last date already passed.
        assert_eq!(infer_status(Some(d(3, 1)), Some(d(1, 1)), d(2, 1)), STATUS_CLOSED);
    }

    #[test]
    fn window_order() {
        assert!(validate_window(Some(d(1, 1)), Some(d(1, 2))).is_ok());
        assert!(validate_window(Some(d(1, 2)), Some(d(1, 1))).is_err());
        assert!(validate_window(None, Some(d(1, 1))).is_ok());
    }

    #[test]
    fn vocabularies() {
        assert!(validate_status(STATUS_COMING_SOON).is_ok());
        assert!(validate_status("open").is_err());
        assert!(validate_level(DEFAULT_LEVEL).is_ok());
        assert!(validate_reminder_type(REMINDER_DEADLINE).is_ok());
        assert!(validate_reminder_type("weekly").is_err());
    }
}
