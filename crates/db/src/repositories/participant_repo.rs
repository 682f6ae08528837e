//! Resolves community participants across `students` and
//! `community_members`.

use sqlx::PgPool;
use sangam_core::community::{Participant, AUTHOR_MEMBER, AUTHOR_STUDENT};
use sangam_core::types::DbId;

use crate::models::community::DirectoryEntry;

/// `(author_type, id, name, user_id)` for every approved participant.
const APPROVED_PARTICIPANTS: &str = "
    SELECT 'student' AS author_type, id, name, user_id FROM students WHERE status = 'approved'
    UNION ALL
    SELECT 'member' AS author_type, id, name, user_id FROM community_members
        WHERE status = 'approved'";

type ParticipantRow = (String, DbId, String, Option<DbId>);

fn into_participant((author_type, id, name, user_id): ParticipantRow) -> Participant {
    Participant {
        author_type,
        id,
        name,
        user_id,
    }
}

pub struct ParticipantRepo;

impl ParticipantRepo {
    /// The approved participant linked to an account.
    ///
    /// When a user is both a student and a member the student record wins.
    pub async fn resolve(pool: &PgPool, user_id: DbId) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT author_type, id, name, user_id FROM ({APPROVED_PARTICIPANTS}) p
             WHERE user_id = $1
             ORDER BY (author_type = '{AUTHOR_STUDENT}') DESC, id
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(into_participant))
    }

    /// The subset of `user_ids` linked to an approved student or member.
    pub async fn participant_user_ids(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT user_id FROM ({APPROVED_PARTICIPANTS}) p
             WHERE user_id = ANY($1)
             ORDER BY user_id"
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }

    /// Look up an approved participant by its `(author_type, id)` pair.
    pub async fn find(
        pool: &PgPool,
        author_type: &str,
        id: DbId,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT author_type, id, name, user_id FROM ({APPROVED_PARTICIPANTS}) p
             WHERE author_type = $1 AND id = $2"
        );
        let row = sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(author_type)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(into_participant))
    }

    /// Whether the account already has a student or member record in any
    /// status.
    pub async fn has_joined(
        pool: &PgPool,
        user_id: DbId,
        author_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let table = if author_type == AUTHOR_MEMBER {
            "community_members"
        } else {
            "students"
        };
        let query = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE user_id = $1)");
        let (exists,): (bool,) = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Approved students and members, by name.
    pub async fn directory(pool: &PgPool) -> Result<Vec<DirectoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, DirectoryEntry>(
            "SELECT 'student' AS author_type, id, name, COALESCE(course, college) AS headline, city
             FROM students WHERE status = 'approved'
             UNION ALL
             SELECT 'member' AS author_type, id, name, COALESCE(profession, role) AS headline,
                    NULL AS city
             FROM community_members WHERE status = 'approved'
             ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }
}
