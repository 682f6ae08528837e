//! Money donations and fundraising campaigns.
//!
//! Payment statuses follow a small lifecycle. Only `completed` donations
//! count towards a campaign's raised amount, so every transition into or out
//! of `completed` carries a signed delta for the campaign total.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::Money;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

pub const PURPOSE_EDUCATION: &str = "education";
pub const PURPOSE_FOOD: &str = "food";
pub const PURPOSE_HEALTH: &str = "health";
pub const PURPOSE_GENERAL: &str = "general";

pub const VALID_PURPOSES: &[&str] = &[PURPOSE_EDUCATION, PURPOSE_FOOD, PURPOSE_HEALTH, PURPOSE_GENERAL];

pub const TYPE_ONE_TIME: &str = "one-time";
pub const TYPE_MONTHLY: &str = "monthly";
pub const TYPE_ANNUAL: &str = "annual";

pub const VALID_TYPES: &[&str] = &[TYPE_ONE_TIME, TYPE_MONTHLY, TYPE_ANNUAL];

pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_COMPLETED: &str = "completed";
pub const PAYMENT_FAILED: &str = "failed";
pub const PAYMENT_REFUNDED: &str = "refunded";

pub const VALID_PAYMENT_STATUSES: &[&str] = &[
    PAYMENT_PENDING,
    PAYMENT_COMPLETED,
    PAYMENT_FAILED,
    PAYMENT_REFUNDED,
];

/// Header row of the admin CSV export.
pub const CSV_HEADERS: &[&str] = &[
    "Date",
    "Donor Name",
    "Email",
    "Phone",
    "Amount",
    "Type",
    "Purpose",
    "Status",
];

pub fn validate_purpose(purpose: &str) -> Result<(), CoreError> {
    validate_one_of("donation purpose", purpose, VALID_PURPOSES)
}

pub fn validate_type(donation_type: &str) -> Result<(), CoreError> {
    validate_one_of("donation type", donation_type, VALID_TYPES)
}

pub fn validate_payment_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("payment status", status, VALID_PAYMENT_STATUSES)
}

// ---------------------------------------------------------------------------
// Payment transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from` may move to.
///
/// - `pending`   -> `completed`, `failed`
/// - `completed` -> `refunded`
/// - `failed`    -> `pending` (retry)
/// - `refunded`  -> (terminal)
pub fn valid_transitions(from: &str) -> &'static [&'static str] {
    match from {
        PAYMENT_PENDING => &[PAYMENT_COMPLETED, PAYMENT_FAILED],
        PAYMENT_COMPLETED => &[PAYMENT_REFUNDED],
        PAYMENT_FAILED => &[PAYMENT_PENDING],
        _ => &[],
    }
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move donation from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Change to apply to the campaign's `raised_amount` for a transition.
pub fn raised_delta(current: &str, next: &str, amount: Money) -> Money {
    match (current == PAYMENT_COMPLETED, next == PAYMENT_COMPLETED) {
        (false, true) => amount,
        (true, false) => -amount,
        _ => Decimal::ZERO,
    }
}

/// Progress towards a campaign target as a percentage in `0..=100`.
///
/// A missing or non-positive target reports 0.
pub fn campaign_progress(raised: Money, target: Money) -> f64 {
    if target <= Decimal::ZERO {
        return 0.0;
    }
    let pct = (raised / target) * Decimal::from(100);
    let pct = pct.to_f64().unwrap_or(0.0);
    pct.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies() {
        assert!(validate_purpose(PURPOSE_FOOD).is_ok());
        assert!(validate_purpose("sports").is_err());
        assert!(validate_type(TYPE_MONTHLY).is_ok());
        assert!(validate_type("weekly").is_err());
        assert!(validate_payment_status(PAYMENT_REFUNDED).is_ok());
    }

    #[test]
    fn pending_transitions() {
        assert!(validate_transition(PAYMENT_PENDING, PAYMENT_COMPLETED).is_ok());
        assert!(validate_transition(PAYMENT_PENDING, PAYMENT_FAILED).is_ok());
        assert!(validate_transition(PAYMENT_PENDING, PAYMENT_REFUNDED).is_err());
    }

    #[test]
    fn refunded_is_terminal() {
        for s in VALID_PAYMENT_STATUSES {
            assert!(validate_transition(PAYMENT_REFUNDED, s).is_err());
        }
    }

    #[test]
    fn raised_delta_signs() {
        let amt = Decimal::new(50000, 2);
        assert_eq!(raised_delta(PAYMENT_PENDING, PAYMENT_COMPLETED, amt), amt);
        assert_eq!(raised_delta(PAYMENT_COMPLETED, PAYMENT_REFUNDED, amt), -amt);
        assert_eq!(raised_delta(PAYMENT_PENDING, PAYMENT_FAILED, amt), Decimal::ZERO);
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(campaign_progress(Decimal::from(50), Decimal::from(200)), 25.0);
        assert_eq!(campaign_progress(Decimal::from(500), Decimal::from(200)), 100.0);
        assert_eq!(campaign_progress(Decimal::from(10), Decimal::ZERO), 0.0);
    }
}
