//! Income and expense ledger entries.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Date, Money, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub transaction_type: String,
    pub category: String,
    pub description: Option<String>,
    pub amount: Money,
    pub transaction_date: Date,
    pub reference_id: Option<String>,
    pub receipt_url: Option<String>,
    pub added_by: Option<DbId>,
    pub verified: bool,
    pub verified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    pub transaction_type: String,
    pub category: String,
    pub description: Option<String>,
    pub amount: Money,
    pub transaction_date: Option<Date>,
    pub reference_id: Option<String>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransaction {
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub transaction_date: Option<Date>,
    pub reference_id: Option<String>,
    pub receipt_url: Option<String>,
}

/// `verified_only` is set for the public transparency page.
#[derive(Debug, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub verified_only: bool,
}
