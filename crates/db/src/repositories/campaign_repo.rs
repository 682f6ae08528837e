//! Repository for fundraising `campaigns`.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::donation::{Campaign, CreateCampaign, UpdateCampaign};

const COLUMNS: &str = "id, title, slug, description, purpose, target_amount, raised_amount, \
                       start_date, end_date, cover_image, is_active, is_featured, \
                       created_at, updated_at";

pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a campaign under an already-resolved slug.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCampaign,
        slug: &str,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (title, slug, description, purpose, target_amount, start_date, end_date,
                 cover_image, is_active, is_featured)
             VALUES ($1, $2, $3, COALESCE($4, 'general'), $5, $6, $7, $8,
                     COALESCE($9, true), COALESCE($10, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.purpose)
            .bind(input.target_amount)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.cover_image)
            .bind(input.is_active)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns, featured first then newest.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE ($1 = false OR is_active = true)
             ORDER BY is_featured DESC, created_at DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                purpose = COALESCE($5, purpose),
                target_amount = COALESCE($6, target_amount),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                cover_image = COALESCE($9, cover_image),
                is_active = COALESCE($10, is_active),
                is_featured = COALESCE($11, is_featured)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.purpose)
            .bind(input.target_amount)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.cover_image)
            .bind(input.is_active)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
