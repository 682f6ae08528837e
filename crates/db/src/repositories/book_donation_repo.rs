//! Repository for `book_donations`.

use sqlx::PgPool;
use sangam_core::search::like_pattern;
use sangam_core::types::DbId;

use crate::models::book_donation::{
    BookDonation, BookDonationFilter, BookDonationStats, CreateBookDonation,
};

const COLUMNS: &str = "id, donor_name, donor_email, donor_phone, donor_address, donor_city, \
                       donor_state, book_title, author, category, book_type, language, \
                       condition, quantity, cover_url, delivery_method, status, received_by, \
                       received_at, notes, created_at, updated_at";

pub struct BookDonationRepo;

impl BookDonationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateBookDonation,
    ) -> Result<BookDonation, sqlx::Error> {
        let query = format!(
            "INSERT INTO book_donations
                (donor_name, donor_email, donor_phone, donor_address, donor_city, donor_state,
                 book_title, author, category, book_type, language, condition, quantity,
                 cover_url, delivery_method, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, 'good'),
                     COALESCE($13, 1), $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookDonation>(&query)
            .bind(&input.donor_name)
            .bind(&input.donor_email)
            .bind(&input.donor_phone)
            .bind(&input.donor_address)
            .bind(&input.donor_city)
            .bind(&input.donor_state)
            .bind(&input.book_title)
            .bind(&input.author)
            .bind(&input.category)
            .bind(&input.book_type)
            .bind(&input.language)
            .bind(&input.condition)
            .bind(input.quantity)
            .bind(&input.cover_url)
            .bind(&input.delivery_method)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List pledges, newest first. `search` matches donor name, email or title.
    pub async fn list(
        pool: &PgPool,
        filter: &BookDonationFilter,
    ) -> Result<Vec<BookDonation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM book_donations
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR donor_name ILIKE $2 OR donor_email ILIKE $2
                    OR book_title ILIKE $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, BookDonation>(&query)
            .bind(&filter.status)
            .bind(like_pattern(filter.search.as_deref()))
            .fetch_all(pool)
            .await
    }

    /// Set the status. `received_by` is recorded (with `received_at = NOW()`)
    /// only when `stamp_receipt` is set.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        stamp_receipt: bool,
        received_by: DbId,
    ) -> Result<Option<BookDonation>, sqlx::Error> {
        let query = format!(
            "UPDATE book_donations SET
                status = $2,
                received_at = CASE WHEN $3 THEN NOW() ELSE received_at END,
                received_by = CASE WHEN $3 THEN $4 ELSE received_by END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookDonation>(&query)
            .bind(id)
            .bind(status)
            .bind(stamp_receipt)
            .bind(received_by)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_notes(
        pool: &PgPool,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<BookDonation>, sqlx::Error> {
        let query =
            format!("UPDATE book_donations SET notes = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, BookDonation>(&query)
            .bind(id)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM book_donations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(pool: &PgPool) -> Result<BookDonationStats, sqlx::Error> {
        sqlx::query_as::<_, BookDonationStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'received') AS received,
                COALESCE(SUM(quantity), 0)::BIGINT AS total_books
             FROM book_donations",
        )
        .fetch_one(pool)
        .await
    }
}
