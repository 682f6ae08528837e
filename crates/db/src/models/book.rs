//! Book catalogue model and DTOs.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub accession_number: String,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub status: String,
    pub condition: String,
    pub location: Option<String>,
    pub donor_id: Option<DbId>,
    pub donor_name: Option<String>,
    pub added_by: Option<DbId>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBook {
    pub accession_number: String,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub donor_id: Option<DbId>,
    pub donor_name: Option<String>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBook {
    pub accession_number: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub donor_name: Option<String>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
}

#[derive(Debug, Default)]
pub struct BookFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookStats {
    pub total: i64,
    pub available: i64,
    pub borrowed: i64,
    pub by_category: Vec<CategoryCount>,
}
