//! Book donation pledges.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookDonation {
    pub id: DbId,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub donor_address: Option<String>,
    pub donor_city: Option<String>,
    pub donor_state: Option<String>,
    pub book_title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub book_type: Option<String>,
    pub language: Option<String>,
    pub condition: String,
    pub quantity: i32,
    pub cover_url: Option<String>,
    pub delivery_method: Option<String>,
    pub status: String,
    pub received_by: Option<DbId>,
    pub received_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookDonation {
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub donor_address: Option<String>,
    pub donor_city: Option<String>,
    pub donor_state: Option<String>,
    pub book_title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub book_type: Option<String>,
    pub language: Option<String>,
    pub condition: Option<String>,
    pub quantity: Option<i32>,
    pub cover_url: Option<String>,
    pub delivery_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct BookDonationFilter {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookDonationStats {
    pub total: i64,
    pub pending: i64,
    pub received: i64,
    pub total_books: i64,
}
