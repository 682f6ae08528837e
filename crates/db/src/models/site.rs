//! Public site content: settings, hero banners, stats, testimonials,
//! contact inquiries and the members directory.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Money, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSetting {
    pub id: DbId,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `PUT /admin/settings/{key}`.
#[derive(Debug, Deserialize)]
pub struct UpsertSetting {
    pub value: serde_json::Value,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Hero content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HeroContent {
    pub id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_primary_text: Option<String>,
    pub cta_primary_link: Option<String>,
    pub cta_secondary_text: Option<String>,
    pub cta_secondary_link: Option<String>,
    pub background_image: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateHeroContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_primary_text: Option<String>,
    pub cta_primary_link: Option<String>,
    pub cta_secondary_text: Option<String>,
    pub cta_secondary_link: Option<String>,
    pub background_image: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHeroContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_primary_text: Option<String>,
    pub cta_primary_link: Option<String>,
    pub cta_secondary_text: Option<String>,
    pub cta_secondary_link: Option<String>,
    pub background_image: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stat {
    pub id: DbId,
    pub key: String,
    pub label: String,
    pub value: i64,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateStat {
    pub key: String,
    pub label: String,
    pub value: Option<i64>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStat {
    pub label: Option<String>,
    pub value: Option<i64>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
}

// ---------------------------------------------------------------------------
// Testimonials
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub content: String,
    pub rating: i32,
    pub photo_url: Option<String>,
    pub category: Option<String>,
    pub is_featured: bool,
    pub is_approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public submissions always start unapproved; admins may set the flags.
#[derive(Debug, Deserialize)]
pub struct CreateTestimonial {
    pub name: String,
    pub role: Option<String>,
    pub content: String,
    pub rating: Option<i32>,
    pub photo_url: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTestimonial {
    pub name: Option<String>,
    pub role: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
    pub photo_url: Option<String>,
    pub category: Option<String>,
    pub is_featured: Option<bool>,
    pub is_approved: Option<bool>,
}

// ---------------------------------------------------------------------------
// Contact inquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactInquiry {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateContactInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactInquiry {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Members directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub member_type: String,
    pub contribution: Option<String>,
    pub village: Option<String>,
    pub skills: Vec<String>,
    pub is_active: bool,
    pub is_approved: bool,
    pub joined_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateMember {
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: Option<String>,
    pub member_type: Option<String>,
    pub contribution: Option<String>,
    pub village: Option<String>,
    pub skills: Option<Vec<String>>,
    pub is_approved: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: Option<String>,
    pub member_type: Option<String>,
    pub contribution: Option<String>,
    pub village: Option<String>,
    pub skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
}

/// Filters for member listings. `public_only` restricts to active and
/// approved rows.
#[derive(Debug, Default)]
pub struct MemberFilter {
    pub member_type: Option<String>,
    pub is_approved: Option<bool>,
    pub search: Option<String>,
    pub public_only: bool,
}

// ---------------------------------------------------------------------------
// Landing page overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SiteOverview {
    pub books_available: i64,
    pub active_members: i64,
    pub upcoming_events: i64,
    pub donations_total: Money,
    pub volunteers_approved: i64,
}
