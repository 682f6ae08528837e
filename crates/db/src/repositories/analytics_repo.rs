//! Read-only aggregates across modules for the admin analytics page and the
//! signed-in user's dashboard.

use sqlx::PgPool;
use sangam_core::types::DbId;

use crate::models::analytics::{Analytics, StatusBreakdown, UserSummary};

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    pub async fn analytics(pool: &PgPool) -> Result<Analytics, sqlx::Error> {
        let (users, books, community_posts): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM profiles),
                (SELECT COUNT(*) FROM books),
                (SELECT COUNT(*) FROM community_posts)",
        )
        .fetch_one(pool)
        .await?;

        let donations = Self::breakdown(
            pool,
            "SELECT payment_status AS status, COUNT(*) AS count, SUM(amount) AS amount
             FROM donations GROUP BY payment_status ORDER BY payment_status",
        )
        .await?;
        let events = Self::breakdown(
            pool,
            "SELECT status, COUNT(*) AS count, NULL::NUMERIC AS amount
             FROM events GROUP BY status ORDER BY status",
        )
        .await?;
        let volunteers = Self::breakdown(
            pool,
            "SELECT status, COUNT(*) AS count, NULL::NUMERIC AS amount
             FROM volunteer_applications GROUP BY status ORDER BY status",
        )
        .await?;
        let exams = Self::breakdown(
            pool,
            "SELECT status, COUNT(*) AS count, NULL::NUMERIC AS amount
             FROM exams WHERE is_active = true GROUP BY status ORDER BY status",
        )
        .await?;
        let contact_inquiries = Self::breakdown(
            pool,
            "SELECT status, COUNT(*) AS count, NULL::NUMERIC AS amount
             FROM contact_inquiries GROUP BY status ORDER BY status",
        )
        .await?;

        Ok(Analytics {
            users,
            books,
            donations,
            events,
            volunteers,
            exams,
            community_posts,
            contact_inquiries,
        })
    }

    async fn breakdown(pool: &PgPool, sql: &str) -> Result<Vec<StatusBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, StatusBreakdown>(sql)
            .fetch_all(pool)
            .await
    }

    /// Per-user counts. Guest rows created before sign-up are matched by
    /// email.
    pub async fn user_summary(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
    ) -> Result<UserSummary, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT
                (SELECT COUNT(*) FROM event_registrations
                  WHERE (user_id = $1 OR lower(email) = lower($2)) AND status <> 'cancelled')
                    AS registrations,
                (SELECT COUNT(*) FROM donations
                  WHERE user_id = $1 OR lower(donor_email) = lower($2)) AS donations,
                (SELECT COALESCE(SUM(amount), 0) FROM donations
                  WHERE (user_id = $1 OR lower(donor_email) = lower($2))
                    AND payment_status = 'completed') AS donated_amount,
                (SELECT COUNT(*) FROM book_issues bi
                  JOIN library_patrons lp ON lp.id = bi.patron_id
                  WHERE (lp.user_id = $1 OR lower(lp.email) = lower($2))
                    AND bi.return_date IS NULL) AS active_book_issues,
                (SELECT COUNT(*) FROM notifications
                  WHERE user_id = $1 AND is_read = false) AS unread_notifications,
                (SELECT COUNT(*) FROM saved_exams WHERE student_id = $1) AS saved_exams",
        )
        .bind(user_id)
        .bind(email)
        .fetch_one(pool)
        .await
    }
}
