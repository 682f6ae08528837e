//! Well-known platform event names published on the event bus.
//!
//! Names are `<area>.<action>`. The realtime router and the activity log
//! both key off these strings.

// Auth and accounts
pub const USER_SIGNED_UP: &str = "user.signed_up";
pub const USER_UPDATED: &str = "user.updated";
pub const PASSWORD_RESET_REQUESTED: &str = "user.password_reset_requested";

// Library
pub const BOOK_CREATED: &str = "book.created";
pub const BOOK_UPDATED: &str = "book.updated";
pub const BOOK_DELETED: &str = "book.deleted";
pub const BOOK_ISSUED: &str = "book.issued";
pub const BOOK_RETURNED: &str = "book.returned";

// Giving
pub const BOOK_DONATION_SUBMITTED: &str = "book_donation.submitted";
pub const BOOK_DONATION_STATUS_CHANGED: &str = "book_donation.status_changed";
pub const DONATION_CREATED: &str = "donation.created";
pub const DONATION_STATUS_CHANGED: &str = "donation.status_changed";

// Events and volunteering
pub const EVENT_REGISTERED: &str = "event.registered";
pub const REGISTRATION_CANCELLED: &str = "event.registration_cancelled";
pub const VOLUNTEER_APPLIED: &str = "volunteer.applied";
pub const VOLUNTEER_REVIEWED: &str = "volunteer.reviewed";

// Community hub
pub const COMMUNITY_POST_CREATED: &str = "community.post_created";
pub const COMMUNITY_REPLY_CREATED: &str = "community.reply_created";
pub const COMMUNITY_MESSAGE_SENT: &str = "community.message_sent";
pub const COMMUNITY_DM_SENT: &str = "community.dm_sent";
pub const COMMUNITY_MEMBER_REVIEWED: &str = "community.member_reviewed";

// Site
pub const CONTACT_SUBMITTED: &str = "contact.submitted";
pub const SETTING_UPDATED: &str = "site.setting_updated";

// Exams
pub const CRAWLER_RUN_FINISHED: &str = "crawler.run_finished";

/// Whether an event belongs to the community hub and should be pushed to
/// connected participants.
pub fn is_community_event(event_type: &str) -> bool {
    matches!(
        event_type,
        COMMUNITY_POST_CREATED | COMMUNITY_REPLY_CREATED | COMMUNITY_MESSAGE_SENT | COMMUNITY_DM_SENT
    )
}
