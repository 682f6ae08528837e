//! Repository for the `site_settings` key/value table.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::site::SiteSetting;

const COLUMNS: &str = "id, key, value, description, updated_by, created_at, updated_at";

pub struct SettingRepo;

impl SettingRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<SiteSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_settings ORDER BY key");
        sqlx::query_as::<_, SiteSetting>(&query).fetch_all(pool).await
    }

    /// Insert or replace a setting by key.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        value: &serde_json::Value,
        description: Option<&str>,
        updated_by: DbId,
    ) -> Result<SiteSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_settings (key, value, description, updated_by)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, site_settings.description),
                updated_by = EXCLUDED.updated_by
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSetting>(&query)
            .bind(key)
            .bind(value)
            .bind(description)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }
}
