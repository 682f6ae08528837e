//! Repository for the `contact_inquiries` table.

use sqlx::PgPool;
use sangam_core::search::like_pattern;
use sangam_core::types::DbId;

use crate::models::site::{ContactInquiry, CreateContactInquiry, UpdateContactInquiry};

const COLUMNS: &str =
    "id, name, email, phone, subject, message, status, admin_notes, created_at, updated_at";

pub struct ContactRepo;

impl ContactRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactInquiry,
    ) -> Result<ContactInquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_inquiries (name, email, phone, subject, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.subject)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// List inquiries, newest first. `search` matches name, email or subject.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<ContactInquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_inquiries
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR name ILIKE $2 OR email ILIKE $2 OR subject ILIKE $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(status)
            .bind(like_pattern(search))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContactInquiry,
    ) -> Result<Option<ContactInquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_inquiries SET
                status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.admin_notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
