//! Repository for `community_members` (mentors and professionals).

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::community::{CommunityMember, CreateCommunityMember};

const COLUMNS: &str = "id, user_id, name, email, phone, role, profession, organization, \
                       experience, skills, linkedin, reason, photo_url, status, \
                       created_at, updated_at";

pub struct CommunityMemberRepo;

impl CommunityMemberRepo {
    /// Submit a membership application.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCommunityMember,
        user_id: DbId,
        status: &str,
    ) -> Result<CommunityMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_members
                (user_id, name, email, phone, role, profession, organization, experience,
                 skills, linkedin, reason, photo_url, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommunityMember>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.role)
            .bind(&input.profession)
            .bind(&input.organization)
            .bind(input.experience)
            .bind(&input.skills)
            .bind(&input.linkedin)
            .bind(&input.reason)
            .bind(&input.photo_url)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<CommunityMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM community_members
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, CommunityMember>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Approve or reject an application.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<CommunityMember>, sqlx::Error> {
        let query = format!(
            "UPDATE community_members SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommunityMember>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM community_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
