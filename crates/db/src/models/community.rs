//! Community hub: participants, forum, group chat and direct messages.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub course: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub interest: Option<String>,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateStudent {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub course: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub interest: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommunityMember {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub profession: Option<String>,
    pub organization: Option<String>,
    pub experience: Option<i32>,
    pub skills: Vec<String>,
    pub linkedin: Option<String>,
    pub reason: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCommunityMember {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub profession: Option<String>,
    pub organization: Option<String>,
    pub experience: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub linkedin: Option<String>,
    pub reason: Option<String>,
    pub photo_url: Option<String>,
}

/// One approved participant in the directory listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DirectoryEntry {
    pub author_type: String,
    pub id: DbId,
    pub name: String,
    pub headline: Option<String>,
    pub city: Option<String>,
}

// ---------------------------------------------------------------------------
// Forum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_answered: bool,
    pub upvotes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Post listing row with its reply count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_answered: bool,
    pub upvotes: i32,
    pub reply_count: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

#[derive(Debug, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reply {
    pub id: DbId,
    pub post_id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub author_name: String,
    pub content: String,
    pub is_best_answer: bool,
    pub upvotes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateReply {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostWithReplies {
    #[serde(flatten)]
    pub post: Post,
    pub replies: Vec<Reply>,
}

// ---------------------------------------------------------------------------
// Chat and direct messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub sender_type: String,
    pub sender_id: DbId,
    pub sender_name: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateChatMessage {
    pub content: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DirectMessage {
    pub id: DbId,
    pub sender_type: String,
    pub sender_id: DbId,
    pub sender_name: String,
    pub receiver_type: String,
    pub receiver_id: DbId,
    pub receiver_name: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct SendDirectMessage {
    pub receiver_type: String,
    pub receiver_id: DbId,
    pub content: String,
}

/// Unread DM count grouped by sender.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnreadCount {
    pub sender_type: String,
    pub sender_id: DbId,
    pub sender_name: String,
    pub count: i64,
}
