//! Repository for the `testimonials` table.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::site::{CreateTestimonial, Testimonial, UpdateTestimonial};

const COLUMNS: &str = "id, name, role, content, rating, photo_url, category, \
                       is_featured, is_approved, created_at, updated_at";

pub struct TestimonialRepo;

impl TestimonialRepo {
    /// List testimonials, featured first then newest.
    pub async fn list(
        pool: &PgPool,
        approved: Option<bool>,
    ) -> Result<Vec<Testimonial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM testimonials
             WHERE ($1::BOOLEAN IS NULL OR is_approved = $1)
             ORDER BY is_featured DESC, created_at DESC"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(approved)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateTestimonial,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials
                (name, role, content, rating, photo_url, category, is_featured, is_approved)
             VALUES ($1, $2, $3, COALESCE($4, 5), $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.content)
            .bind(input.rating)
            .bind(&input.photo_url)
            .bind(&input.category)
            .bind(input.is_featured)
            .bind(input.is_approved)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                content = COALESCE($4, content),
                rating = COALESCE($5, rating),
                photo_url = COALESCE($6, photo_url),
                category = COALESCE($7, category),
                is_featured = COALESCE($8, is_featured),
                is_approved = COALESCE($9, is_approved)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.content)
            .bind(input.rating)
            .bind(&input.photo_url)
            .bind(&input.category)
            .bind(input.is_featured)
            .bind(input.is_approved)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_approved(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials SET is_approved = NOT is_approved WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_featured(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials SET is_featured = NOT is_featured WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
