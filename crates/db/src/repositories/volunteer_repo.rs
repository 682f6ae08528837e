//! Repository for `volunteer_applications`.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::volunteer::{
    CreateVolunteerApplication, ReviewVolunteerApplication, VolunteerApplication,
};

const COLUMNS: &str = "id, user_id, name, email, phone, city, skills, interests, availability, \
                       experience, status, reviewed_by, reviewed_at, notes, created_at, updated_at";

pub struct VolunteerRepo;

impl VolunteerRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateVolunteerApplication,
        user_id: Option<DbId>,
    ) -> Result<VolunteerApplication, sqlx::Error> {
        let query = format!(
            "INSERT INTO volunteer_applications
                (user_id, name, email, phone, city, skills, interests, availability, experience)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VolunteerApplication>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.city)
            .bind(&input.skills)
            .bind(&input.interests)
            .bind(&input.availability)
            .bind(&input.experience)
            .fetch_one(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<VolunteerApplication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM volunteer_applications
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, VolunteerApplication>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Apply a review and stamp the reviewer.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        input: &ReviewVolunteerApplication,
        reviewed_by: DbId,
    ) -> Result<Option<VolunteerApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE volunteer_applications SET
                status = COALESCE($2, status),
                notes = COALESCE($3, notes),
                reviewed_by = $4,
                reviewed_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VolunteerApplication>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.notes)
            .bind(reviewed_by)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM volunteer_applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
