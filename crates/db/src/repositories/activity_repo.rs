//! Repository for the append-only `activity_logs` table.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::activity::{ActivityLog, CreateActivityLog};

const COLUMNS: &str = "id, user_id, action, entity_type, entity_id, details, ip_address, \
                       user_agent, created_at, updated_at";

pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a log row, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &CreateActivityLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_logs (user_id, action, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.action)
        .bind(&input.entity_type)
        .bind(input.entity_id)
        .bind(&input.details)
        .fetch_one(pool)
        .await
    }

    /// Most recent entries first, optionally narrowed to one entity type.
    pub async fn list(
        pool: &PgPool,
        entity_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs \
             WHERE ($1::TEXT IS NULL OR entity_type = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entity_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
