//! Profile (user account) model and DTOs.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `profiles` table.
///
/// Carries the password hash. Use [`ProfileResponse`] for anything that
/// leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public representation of a profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            phone: p.phone,
            avatar_url: p.avatar_url,
            role: p.role,
            is_active: p.is_active,
            last_login_at: p.last_login_at,
            created_at: p.created_at,
        }
    }
}

/// Insert DTO. The password is already hashed.
#[derive(Debug)]
pub struct CreateProfile {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
}

/// Self-service profile update.
#[derive(Debug, Deserialize)]
pub struct UpdateOwnProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Admin update of any profile.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Headline counts for the admin users page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileCounts {
    pub total: i64,
    pub active: i64,
    pub admins: i64,
    pub librarians: i64,
}
