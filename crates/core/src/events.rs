//! Community events (workshops, drives, meetups) and their registrations.

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Event vocabularies
// ---------------------------------------------------------------------------

pub const TYPE_WORKSHOP: &str = "workshop";
pub const TYPE_DONATION_DRIVE: &str = "donation-drive";
pub const TYPE_SEMINAR: &str = "seminar";
pub const TYPE_MEETUP: &str = "meetup";
pub const TYPE_OTHER: &str = "other";

pub const VALID_TYPES: &[&str] = &[
    TYPE_WORKSHOP,
    TYPE_DONATION_DRIVE,
    TYPE_SEMINAR,
    TYPE_MEETUP,
    TYPE_OTHER,
];

pub const STATUS_UPCOMING: &str = "upcoming";
pub const STATUS_ONGOING: &str = "ongoing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_UPCOMING,
    STATUS_ONGOING,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Registration vocabulary
// ---------------------------------------------------------------------------

pub const REG_REGISTERED: &str = "registered";
pub const REG_CONFIRMED: &str = "confirmed";
pub const REG_ATTENDED: &str = "attended";
pub const REG_CANCELLED: &str = "cancelled";

pub const VALID_REGISTRATION_STATUSES: &[&str] =
    &[REG_REGISTERED, REG_CONFIRMED, REG_ATTENDED, REG_CANCELLED];

pub fn validate_type(event_type: &str) -> Result<(), CoreError> {
    validate_one_of("event type", event_type, VALID_TYPES)
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("event status", status, VALID_STATUSES)
}

pub fn validate_registration_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("registration status", status, VALID_REGISTRATION_STATUSES)
}

/// End time, when given, must not precede the start.
pub fn validate_schedule(start: Timestamp, end: Option<Timestamp>) -> Result<(), CoreError> {
    if let Some(end) = end {
        if end < start {
            return Err(CoreError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
    }
    Ok(())
}

/// Capacity must be positive when set.
pub fn validate_capacity(capacity: Option<i32>) -> Result<(), CoreError> {
    match capacity {
        Some(c) if c < 1 => Err(CoreError::Validation(
            "capacity must be at least 1".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Whether a new registration can be accepted.
///
/// Closed (completed or cancelled) events and full events reject with
/// `Conflict`. A `None` capacity means unlimited.
pub fn check_registration_open(
    status: &str,
    capacity: Option<i32>,
    registered_count: i32,
) -> Result<(), CoreError> {
    if status == STATUS_COMPLETED || status == STATUS_CANCELLED {
        return Err(CoreError::Conflict(format!(
            "Registration is closed for {status} events"
        )));
    }
    check_seat_available(capacity, registered_count)
}

/// Whether one more seat fits under `capacity`.
pub fn check_seat_available(capacity: Option<i32>, registered_count: i32) -> Result<(), CoreError> {
    match capacity {
        Some(cap) if registered_count >= cap => {
            Err(CoreError::Conflict("Event is full".to_string()))
        }
        _ => Ok(()),
    }
}

/// Whether a registration in `status` occupies a seat.
pub fn holds_seat(status: &str) -> bool {
    status != REG_CANCELLED
}
