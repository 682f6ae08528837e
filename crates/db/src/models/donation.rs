//! Campaigns and money donations.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Date, Money, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub purpose: String,
    pub target_amount: Money,
    pub raised_amount: Money,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub cover_image: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Campaign with its progress percentage for display.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithProgress {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub progress: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub target_amount: Money,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub cover_image: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCampaign {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub target_amount: Option<Money>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub cover_image: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub campaign_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: Money,
    pub donation_type: String,
    pub purpose: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub transaction_id: Option<String>,
    pub is_anonymous: bool,
    pub message: Option<String>,
    pub receipt_sent: bool,
    pub donated_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for public and admin donation creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateDonation {
    pub campaign_id: Option<DbId>,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: Money,
    pub donation_type: Option<String>,
    pub purpose: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub message: Option<String>,
    pub donated_at: Option<Timestamp>,
}

#[derive(Debug, Default)]
pub struct DonationFilter {
    pub campaign_id: Option<DbId>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DonationStats {
    pub total_amount: Money,
    pub donor_count: i64,
}
