//! Volunteer applications.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VolunteerApplication {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub availability: Option<String>,
    pub experience: Option<String>,
    pub status: String,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateVolunteerApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub availability: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewVolunteerApplication {
    pub status: Option<String>,
    pub notes: Option<String>,
}
