/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates without a time component (exam deadlines, ledger dates).
pub type Date = chrono::NaiveDate;

/// Money amounts, stored as `NUMERIC(12,2)`.
pub type Money = rust_decimal::Decimal;
