//! Repository for the `books` catalogue.

use sqlx::PgPool;
use sangam_core::error::CoreError;
use sangam_core::search::like_pattern;
use sangam_core::types::DbId;

use crate::error::RepoError;
use crate::models::book::{Book, BookFilter, BookStats, CategoryCount, CreateBook, UpdateBook};

const COLUMNS: &str = "id, accession_number, title, author, isbn, publisher, publication_year, \
                       category, description, cover_image, status, condition, location, \
                       donor_id, donor_name, added_by, total_copies, available_copies, \
                       created_at, updated_at";

pub struct BookRepo;

impl BookRepo {
    /// Insert a book. Copy counts and defaults are resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBook,
        added_by: DbId,
    ) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books
                (accession_number, title, author, isbn, publisher, publication_year, category,
                 description, cover_image, status, condition, location, donor_id, donor_name,
                 added_by, total_copies, available_copies)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'other'), $8, $9,
                     COALESCE($10, 'available'), COALESCE($11, 'good'), $12, $13, $14, $15,
                     COALESCE($16, 1), COALESCE($17, $16, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.accession_number)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.isbn)
            .bind(&input.publisher)
            .bind(input.publication_year)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.cover_image)
            .bind(&input.status)
            .bind(&input.condition)
            .bind(&input.location)
            .bind(input.donor_id)
            .bind(&input.donor_name)
            .bind(added_by)
            .bind(input.total_copies)
            .bind(input.available_copies)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List books by title. `search` matches title or author.
    pub async fn list(
        pool: &PgPool,
        filter: &BookFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books
             WHERE ($1::TEXT IS NULL OR category = $1)
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR title ILIKE $3 OR author ILIKE $3)
             ORDER BY title, id
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&filter.category)
            .bind(&filter.status)
            .bind(like_pattern(filter.search.as_deref()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Partial update. `status` is the already-resolved status.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
        status: Option<&str>,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                accession_number = COALESCE($2, accession_number),
                title = COALESCE($3, title),
                author = COALESCE($4, author),
                isbn = COALESCE($5, isbn),
                publisher = COALESCE($6, publisher),
                publication_year = COALESCE($7, publication_year),
                category = COALESCE($8, category),
                description = COALESCE($9, description),
                cover_image = COALESCE($10, cover_image),
                status = COALESCE($11, status),
                condition = COALESCE($12, condition),
                location = COALESCE($13, location),
                donor_name = COALESCE($14, donor_name),
                total_copies = COALESCE($15, total_copies),
                available_copies = COALESCE($16, available_copies)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.accession_number)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.isbn)
            .bind(&input.publisher)
            .bind(input.publication_year)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.cover_image)
            .bind(status)
            .bind(&input.condition)
            .bind(&input.location)
            .bind(&input.donor_name)
            .bind(input.total_copies)
            .bind(input.available_copies)
            .fetch_optional(pool)
            .await
    }

    /// Delete a book unless it is out on loan.
    ///
    /// Returns `Ok(false)` when the book does not exist and a `Conflict`
    /// rule error while an unreturned issue references it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let (active,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM book_issues WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if active > 0 {
            return Err(CoreError::Conflict(format!(
                "Book has {active} copy(ies) out on loan"
            ))
            .into());
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn stats(pool: &PgPool) -> Result<BookStats, sqlx::Error> {
        let (total, available, borrowed): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'available'),
                COUNT(*) FILTER (WHERE status = 'borrowed')
             FROM books",
        )
        .fetch_one(pool)
        .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM books GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await?;

        Ok(BookStats {
            total,
            available,
            borrowed,
            by_category,
        })
    }
}
