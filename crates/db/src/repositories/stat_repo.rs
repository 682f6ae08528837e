//! Repository for the landing page `stats` table.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::site::{CreateStat, SiteOverview, Stat, UpdateStat};

const COLUMNS: &str =
    "id, key, label, value, icon, color, display_order, is_visible, created_at, updated_at";

pub struct StatRepo;

impl StatRepo {
    pub async fn list(pool: &PgPool, visible_only: bool) -> Result<Vec<Stat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stats
             WHERE ($1 = false OR is_visible = true)
             ORDER BY display_order, id"
        );
        sqlx::query_as::<_, Stat>(&query)
            .bind(visible_only)
            .fetch_all(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateStat) -> Result<Stat, sqlx::Error> {
        let query = format!(
            "INSERT INTO stats (key, label, value, icon, color, display_order, is_visible)
             VALUES ($1, $2, COALESCE($3, 0), $4, $5, COALESCE($6, 0), COALESCE($7, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stat>(&query)
            .bind(&input.key)
            .bind(&input.label)
            .bind(input.value)
            .bind(&input.icon)
            .bind(&input.color)
            .bind(input.display_order)
            .bind(input.is_visible)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStat,
    ) -> Result<Option<Stat>, sqlx::Error> {
        let query = format!(
            "UPDATE stats SET
                label = COALESCE($2, label),
                value = COALESCE($3, value),
                icon = COALESCE($4, icon),
                color = COALESCE($5, color),
                display_order = COALESCE($6, display_order),
                is_visible = COALESCE($7, is_visible)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stat>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(input.value)
            .bind(&input.icon)
            .bind(&input.color)
            .bind(input.display_order)
            .bind(input.is_visible)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stats WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Live headline counts computed across the domain tables.
    pub async fn overview(pool: &PgPool) -> Result<SiteOverview, sqlx::Error> {
        sqlx::query_as::<_, SiteOverview>(
            "SELECT
                (SELECT COALESCE(SUM(available_copies), 0)::BIGINT FROM books
                    WHERE status = 'available') AS books_available,
                (SELECT COUNT(*) FROM members
                    WHERE is_active = true AND is_approved = true) AS active_members,
                (SELECT COUNT(*) FROM events
                    WHERE is_published = true AND status = 'upcoming') AS upcoming_events,
                (SELECT COALESCE(SUM(amount), 0) FROM donations
                    WHERE payment_status = 'completed') AS donations_total,
                (SELECT COUNT(*) FROM volunteer_applications
                    WHERE status = 'approved') AS volunteers_approved",
        )
        .fetch_one(pool)
        .await
    }
}
