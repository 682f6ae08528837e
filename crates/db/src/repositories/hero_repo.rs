//! Repository for the `hero_content` table.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::site::{CreateHeroContent, HeroContent, UpdateHeroContent};

const COLUMNS: &str = "id, title, subtitle, cta_primary_text, cta_primary_link, \
                       cta_secondary_text, cta_secondary_link, background_image, \
                       display_order, is_active, created_at, updated_at";

pub struct HeroRepo;

impl HeroRepo {
    /// List hero rows by display order. `active_only` hides inactive ones.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<HeroContent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hero_content
             WHERE ($1 = false OR is_active = true)
             ORDER BY display_order, id"
        );
        sqlx::query_as::<_, HeroContent>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateHeroContent,
    ) -> Result<HeroContent, sqlx::Error> {
        let query = format!(
            "INSERT INTO hero_content
                (title, subtitle, cta_primary_text, cta_primary_link, cta_secondary_text,
                 cta_secondary_link, background_image, display_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HeroContent>(&query)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.cta_primary_text)
            .bind(&input.cta_primary_link)
            .bind(&input.cta_secondary_text)
            .bind(&input.cta_secondary_link)
            .bind(&input.background_image)
            .bind(input.display_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHeroContent,
    ) -> Result<Option<HeroContent>, sqlx::Error> {
        let query = format!(
            "UPDATE hero_content SET
                title = COALESCE($2, title),
                subtitle = COALESCE($3, subtitle),
                cta_primary_text = COALESCE($4, cta_primary_text),
                cta_primary_link = COALESCE($5, cta_primary_link),
                cta_secondary_text = COALESCE($6, cta_secondary_text),
                cta_secondary_link = COALESCE($7, cta_secondary_link),
                background_image = COALESCE($8, background_image),
                display_order = COALESCE($9, display_order),
                is_active = COALESCE($10, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HeroContent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.cta_primary_text)
            .bind(&input.cta_primary_link)
            .bind(&input.cta_secondary_text)
            .bind(&input.cta_secondary_link)
            .bind(&input.background_image)
            .bind(input.display_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hero_content WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
