//! Aggregates for the admin analytics page and the user dashboard.

use serde::Serialize;
use sangam_core::types::Money;
use sqlx::FromRow;

/// Row count (and optional amount) per status value.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusBreakdown {
    pub status: String,
    pub count: i64,
    pub amount: Option<Money>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub users: i64,
    pub books: i64,
    pub donations: Vec<StatusBreakdown>,
    pub events: Vec<StatusBreakdown>,
    pub volunteers: Vec<StatusBreakdown>,
    pub exams: Vec<StatusBreakdown>,
    pub community_posts: i64,
    pub contact_inquiries: Vec<StatusBreakdown>,
}

/// Counts shown on a signed-in user's dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub registrations: i64,
    pub donations: i64,
    pub donated_amount: Money,
    pub active_book_issues: i64,
    pub unread_notifications: i64,
    pub saved_exams: i64,
}
