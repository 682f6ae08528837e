//! Library patrons and book issues.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Date, Money, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Patrons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patron {
    pub id: DbId,
    pub patron_code: String,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub max_books_allowed: i32,
    pub is_active: bool,
    pub membership_start: Date,
    pub membership_end: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePatron {
    pub patron_code: String,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub max_books_allowed: Option<i32>,
    pub membership_start: Option<Date>,
    pub membership_end: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatron {
    pub user_id: Option<DbId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub max_books_allowed: Option<i32>,
    pub is_active: Option<bool>,
    pub membership_end: Option<Date>,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// A row from the `book_issues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookIssue {
    pub id: DbId,
    pub book_id: DbId,
    pub patron_id: DbId,
    pub issued_by: Option<DbId>,
    pub issue_date: Timestamp,
    pub due_date: Timestamp,
    pub return_date: Option<Timestamp>,
    pub returned_by: Option<DbId>,
    pub status: String,
    pub fine_amount: Money,
    pub fine_paid: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Issue joined with the book title and patron name for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookIssueDetail {
    pub id: DbId,
    pub book_id: DbId,
    pub book_title: String,
    pub accession_number: String,
    pub patron_id: DbId,
    pub patron_name: String,
    pub patron_code: String,
    pub issue_date: Timestamp,
    pub due_date: Timestamp,
    pub return_date: Option<Timestamp>,
    pub status: String,
    pub fine_amount: Money,
    pub fine_paid: bool,
    pub notes: Option<String>,
}

/// Insert DTO for an issue. `due_date` has already been defaulted.
#[derive(Debug)]
pub struct IssueBook {
    pub book_id: DbId,
    pub patron_id: DbId,
    pub issued_by: DbId,
    pub issue_date: Timestamp,
    pub due_date: Timestamp,
    pub notes: Option<String>,
}

/// Return DTO. The fine is computed from the stored due date.
#[derive(Debug)]
pub struct ReturnBook {
    pub returned_by: DbId,
    pub return_date: Timestamp,
}

#[derive(Debug, Default)]
pub struct IssueFilter {
    pub status: Option<String>,
    pub patron_id: Option<DbId>,
    pub book_id: Option<DbId>,
    pub overdue_only: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LibraryDashboard {
    pub total_books: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub total_patrons: i64,
    pub active_issues: i64,
    pub overdue_issues: i64,
    pub issued_this_month: i64,
    pub returned_this_month: i64,
    pub outstanding_fines: Money,
}
