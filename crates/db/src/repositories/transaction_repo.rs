//! Repository for the income/expense `transactions` ledger.

use sqlx::PgPool;
use sangam_core::finance::FinancialSummary;
use sangam_core::types::{Date, DbId, Money};

use crate::models::transaction::{
    CreateTransaction, Transaction, TransactionFilter, UpdateTransaction,
};

const COLUMNS: &str = "id, transaction_type, category, description, amount, transaction_date, \
                       reference_id, receipt_url, added_by, verified, verified_by, \
                       created_at, updated_at";

pub struct TransactionRepo;

impl TransactionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTransaction,
        added_by: DbId,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions
                (transaction_type, category, description, amount, transaction_date,
                 reference_id, receipt_url, added_by)
             VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(&input.transaction_type)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.transaction_date)
            .bind(&input.reference_id)
            .bind(&input.receipt_url)
            .bind(added_by)
            .fetch_one(pool)
            .await
    }

    /// List entries, most recent transaction date first.
    pub async fn list(
        pool: &PgPool,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE ($1::TEXT IS NULL OR transaction_type = $1)
               AND ($2::DATE IS NULL OR transaction_date >= $2)
               AND ($3::DATE IS NULL OR transaction_date <= $3)
               AND ($4 = false OR verified = true)
             ORDER BY transaction_date DESC, id DESC"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(&filter.transaction_type)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.verified_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTransaction,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            "UPDATE transactions SET
                transaction_type = COALESCE($2, transaction_type),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                amount = COALESCE($5, amount),
                transaction_date = COALESCE($6, transaction_date),
                reference_id = COALESCE($7, reference_id),
                receipt_url = COALESCE($8, receipt_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(&input.transaction_type)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.transaction_date)
            .bind(&input.reference_id)
            .bind(&input.receipt_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn verify(
        pool: &PgPool,
        id: DbId,
        verified_by: DbId,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            "UPDATE transactions SET verified = true, verified_by = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(verified_by)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Income, expense and balance over verified entries in an optional
    /// date range.
    pub async fn summary(
        pool: &PgPool,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<FinancialSummary, sqlx::Error> {
        let (income, expense): (Option<Money>, Option<Money>) = sqlx::query_as(
            "SELECT
                SUM(amount) FILTER (WHERE transaction_type = 'income'),
                SUM(amount) FILTER (WHERE transaction_type = 'expense')
             FROM transactions
             WHERE verified = true
               AND ($1::DATE IS NULL OR transaction_date >= $1)
               AND ($2::DATE IS NULL OR transaction_date <= $2)",
        )
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await?;
        Ok(FinancialSummary::from_totals(income, expense))
    }
}
