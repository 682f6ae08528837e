//! Community events and registrations.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub event_type: String,
    pub status: String,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub location: Option<String>,
    pub venue_address: Option<String>,
    pub is_online: bool,
    pub online_link: Option<String>,
    pub cover_image: Option<String>,
    pub capacity: Option<i32>,
    pub registered_count: i32,
    pub organizer_id: Option<DbId>,
    pub is_featured: bool,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub location: Option<String>,
    pub venue_address: Option<String>,
    pub is_online: Option<bool>,
    pub online_link: Option<String>,
    pub cover_image: Option<String>,
    pub capacity: Option<i32>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub location: Option<String>,
    pub venue_address: Option<String>,
    pub is_online: Option<bool>,
    pub online_link: Option<String>,
    pub cover_image: Option<String>,
    pub capacity: Option<i32>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default)]
pub struct EventFilter {
    pub status: Option<String>,
    pub published_only: bool,
}

// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventRegistration {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub attended: bool,
    pub registered_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Registration joined with its event for the user dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegistrationWithEvent {
    pub id: DbId,
    pub event_id: DbId,
    pub event_title: String,
    pub event_start_date: Timestamp,
    pub event_status: String,
    pub status: String,
    pub attended: bool,
    pub registered_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateRegistration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRegistration {
    pub status: Option<String>,
    pub attended: Option<bool>,
}
