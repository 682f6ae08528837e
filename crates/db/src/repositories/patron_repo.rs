//! Repository for `library_patrons`.

use sqlx::PgPool;
use sangam_core::search::like_pattern;
use sangam_core::types::DbId;

use crate::models::library::{CreatePatron, Patron, UpdatePatron};

const COLUMNS: &str = "id, patron_code, user_id, name, email, phone, address, max_books_allowed, \
                       is_active, membership_start, membership_end, created_at, updated_at";

pub struct PatronRepo;

impl PatronRepo {
    pub async fn create(pool: &PgPool, input: &CreatePatron) -> Result<Patron, sqlx::Error> {
        let query = format!(
            "INSERT INTO library_patrons
                (patron_code, user_id, name, email, phone, address, max_books_allowed,
                 membership_start, membership_end)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 3), COALESCE($8, CURRENT_DATE), $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patron>(&query)
            .bind(&input.patron_code)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.max_books_allowed)
            .bind(input.membership_start)
            .bind(input.membership_end)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Patron>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM library_patrons WHERE id = $1");
        sqlx::query_as::<_, Patron>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The active patron record linked to a user, by user id or email.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
    ) -> Result<Option<Patron>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM library_patrons
             WHERE user_id = $1 OR lower(email) = lower($2)
             ORDER BY (user_id = $1) DESC NULLS LAST, is_active DESC, id
             LIMIT 1"
        );
        sqlx::query_as::<_, Patron>(&query)
            .bind(user_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List patrons by name. `search` matches name or patron code.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        include_inactive: bool,
    ) -> Result<Vec<Patron>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM library_patrons
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR patron_code ILIKE $1)
               AND ($2 = true OR is_active = true)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Patron>(&query)
            .bind(like_pattern(search))
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePatron,
    ) -> Result<Option<Patron>, sqlx::Error> {
        let query = format!(
            "UPDATE library_patrons SET
                user_id = COALESCE($2, user_id),
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                max_books_allowed = COALESCE($7, max_books_allowed),
                is_active = COALESCE($8, is_active),
                membership_end = COALESCE($9, membership_end)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patron>(&query)
            .bind(id)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.max_books_allowed)
            .bind(input.is_active)
            .bind(input.membership_end)
            .fetch_optional(pool)
            .await
    }

    /// Soft delete. Returns `true` if the patron was active.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE library_patrons SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
