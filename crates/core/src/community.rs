//! Community hub: forum, group chat and direct messages.
//!
//! Participants are approved students or approved community members. A
//! participant is identified by `(author_type, id)` since the two live in
//! separate tables.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::{require_non_empty, validate_max_length, validate_one_of, MAX_NAME_LENGTH};

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

pub const AUTHOR_STUDENT: &str = "student";
pub const AUTHOR_MEMBER: &str = "member";

pub const VALID_AUTHOR_TYPES: &[&str] = &[AUTHOR_STUDENT, AUTHOR_MEMBER];

pub const CATEGORY_DOUBT: &str = "doubt";
pub const CATEGORY_DISCUSSION: &str = "discussion";
pub const CATEGORY_RESOURCE: &str = "resource";
pub const CATEGORY_ANNOUNCEMENT: &str = "announcement";
pub const CATEGORY_GENERAL: &str = "general";

pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_DOUBT,
    CATEGORY_DISCUSSION,
    CATEGORY_RESOURCE,
    CATEGORY_ANNOUNCEMENT,
    CATEGORY_GENERAL,
];

pub const MEMBERSHIP_PENDING: &str = "pending";
pub const MEMBERSHIP_APPROVED: &str = "approved";
pub const MEMBERSHIP_REJECTED: &str = "rejected";

pub const VALID_MEMBERSHIP_STATUSES: &[&str] =
    &[MEMBERSHIP_PENDING, MEMBERSHIP_APPROVED, MEMBERSHIP_REJECTED];

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Chat and DM message length limit (characters).
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Forum post/reply body limit (characters).
pub const MAX_POST_LENGTH: usize = 20_000;

/// Group chat history window.
pub const CHAT_HISTORY_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A resolved community participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub author_type: String,
    pub id: DbId,
    pub name: String,
    /// Owning account, when linked.
    pub user_id: Option<DbId>,
}

impl Participant {
    /// Whether this participant is the `(author_type, author_id)` pair.
    pub fn is(&self, author_type: &str, author_id: DbId) -> bool {
        self.author_type == author_type && self.id == author_id
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_author_type(author_type: &str) -> Result<(), CoreError> {
    validate_one_of("author type", author_type, VALID_AUTHOR_TYPES)
}

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    validate_one_of("post category", category, VALID_CATEGORIES)
}

pub fn validate_membership_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("membership status", status, VALID_MEMBERSHIP_STATUSES)
}

/// Chat and DM bodies: non-empty, at most [`MAX_MESSAGE_LENGTH`].
pub fn validate_message(content: &str) -> Result<(), CoreError> {
    require_non_empty("content", content)?;
    validate_max_length("content", content, MAX_MESSAGE_LENGTH)
}

/// Forum post: title and body required.
pub fn validate_post(title: &str, content: &str) -> Result<(), CoreError> {
    require_non_empty("title", title)?;
    validate_max_length("title", title, MAX_NAME_LENGTH)?;
    require_non_empty("content", content)?;
    validate_max_length("content", content, MAX_POST_LENGTH)
}

/// Forum reply body.
pub fn validate_reply(content: &str) -> Result<(), CoreError> {
    require_non_empty("content", content)?;
    validate_max_length("content", content, MAX_POST_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_limits() {
        assert!(validate_message("namaste").is_ok());
        assert!(validate_message("  ").is_err());
        assert!(validate_message(&"x".repeat(MAX_MESSAGE_LENGTH)).is_ok());
        assert!(validate_message(&"x".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }

    #[test]
    fn posts_need_title_and_body() {
        assert!(validate_post("Doubt in algebra", "How do I factor x^2-1?").is_ok());
        assert!(validate_post("", "body").is_err());
        assert!(validate_post("title", "").is_err());
    }

    #[test]
    fn participant_identity() {
        let p = Participant {
            author_type: AUTHOR_STUDENT.to_string(),
            id: 7,
            name: "Ravi".to_string(),
            user_id: Some(3),
        };
        assert!(p.is(AUTHOR_STUDENT, 7));
        assert!(!p.is(AUTHOR_MEMBER, 7));
        assert!(!p.is(AUTHOR_STUDENT, 8));
    }

    #[test]
    fn vocabularies() {
        assert!(validate_author_type(AUTHOR_MEMBER).is_ok());
        assert!(validate_author_type("guest").is_err());
        assert!(validate_category(CATEGORY_DOUBT).is_ok());
        assert!(validate_membership_status(MEMBERSHIP_APPROVED).is_ok());
    }
}
