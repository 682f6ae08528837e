//! Repository for the `members` directory.

use sqlx::PgPool;
use sangam_core::search::like_pattern;
use sangam_core::types::DbId;

use crate::models::site::{CreateMember, Member, MemberFilter, UpdateMember};

const COLUMNS: &str = "id, user_id, name, email, phone, photo_url, role, member_type, \
                       contribution, village, skills, is_active, is_approved, joined_at, \
                       created_at, updated_at";

pub struct MemberRepo;

impl MemberRepo {
    /// List members by name. `search` matches name or village.
    pub async fn list(pool: &PgPool, filter: &MemberFilter) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members
             WHERE ($1::TEXT IS NULL OR member_type = $1)
               AND ($2::BOOLEAN IS NULL OR is_approved = $2)
               AND ($3::TEXT IS NULL OR name ILIKE $3 OR village ILIKE $3)
               AND ($4 = false OR (is_active = true AND is_approved = true))
             ORDER BY name"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&filter.member_type)
            .bind(filter.is_approved)
            .bind(like_pattern(filter.search.as_deref()))
            .bind(filter.public_only)
            .fetch_all(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members
                (user_id, name, email, phone, photo_url, role, member_type, contribution,
                 village, skills, is_approved)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Member'), COALESCE($7, 'volunteer'),
                     $8, $9, COALESCE($10, '{{}}'::TEXT[]), COALESCE($11, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.photo_url)
            .bind(&input.role)
            .bind(&input.member_type)
            .bind(&input.contribution)
            .bind(&input.village)
            .bind(&input.skills)
            .bind(input.is_approved)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                photo_url = COALESCE($5, photo_url),
                role = COALESCE($6, role),
                member_type = COALESCE($7, member_type),
                contribution = COALESCE($8, contribution),
                village = COALESCE($9, village),
                skills = COALESCE($10, skills),
                is_active = COALESCE($11, is_active),
                is_approved = COALESCE($12, is_approved)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.photo_url)
            .bind(&input.role)
            .bind(&input.member_type)
            .bind(&input.contribution)
            .bind(&input.village)
            .bind(&input.skills)
            .bind(input.is_active)
            .bind(input.is_approved)
            .fetch_optional(pool)
            .await
    }

    /// Soft delete. Returns `true` if the member was active.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE members SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query =
            format!("UPDATE members SET is_approved = true WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
