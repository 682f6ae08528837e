//! Repository for `exams`, `saved_exams` and `exam_reminders`.

use sqlx::PgPool;
use sangam_core::search::like_pattern;
use sangam_core::types::{Date, DbId};

use crate::models::exam::{
    CreateExam, Exam, ExamFilter, ExamReminder, ExamStats, ExamUpsert, LabelCount,
    StatusRefresh, UpdateExam,
};

const COLUMNS: &str = "id, exam_name, organization, level, state, description, eligibility, \
                       qualification, age_limit, application_start_date, application_last_date, \
                       exam_date, official_website, notification_pdf, application_fee, \
                       selection_process, status, is_active, created_at, updated_at";

/// Shared filter predicate; binds `$1..$5`.
const FILTER: &str = "($1::TEXT IS NULL OR level = $1)
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR state = $3)
               AND ($4::TEXT IS NULL OR exam_name ILIKE $4 OR organization ILIKE $4
                    OR description ILIKE $4)
               AND ($5 = false OR is_active = true)";

/// Status derived from the application window relative to `$1`.
const INFERRED_STATUS: &str = "CASE
                    WHEN application_last_date < $1 THEN 'Closed'
                    WHEN application_start_date > $1 THEN 'Coming Soon'
                    ELSE 'Open'
                 END";

pub struct ExamRepo;

impl ExamRepo {
    /// Insert an exam with an already-resolved status.
    pub async fn create(pool: &PgPool, input: &CreateExam, status: &str) -> Result<Exam, sqlx::Error> {
        let query = format!(
            "INSERT INTO exams
                (exam_name, organization, level, state, description, eligibility, qualification,
                 age_limit, application_start_date, application_last_date, exam_date,
                 official_website, notification_pdf, application_fee, selection_process, status)
             VALUES ($1, $2, COALESCE($3, 'Central'), $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        bind_exam(sqlx::query_as::<_, Exam>(&query), input, status)
            .fetch_one(pool)
            .await
    }

    /// Insert or refresh an exam keyed by case-insensitive name and
    /// organization. Known fields are only overwritten by non-null values.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreateExam,
        status: &str,
    ) -> Result<ExamUpsert, sqlx::Error> {
        let query = "INSERT INTO exams
                (exam_name, organization, level, state, description, eligibility, qualification,
                 age_limit, application_start_date, application_last_date, exam_date,
                 official_website, notification_pdf, application_fee, selection_process, status)
             VALUES ($1, $2, COALESCE($3, 'Central'), $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     $13, $14, $15, $16)
             ON CONFLICT ((lower(exam_name)), (lower(organization))) DO UPDATE SET
                level = COALESCE($3, exams.level),
                state = COALESCE(EXCLUDED.state, exams.state),
                description = COALESCE(EXCLUDED.description, exams.description),
                eligibility = COALESCE(EXCLUDED.eligibility, exams.eligibility),
                qualification = COALESCE(EXCLUDED.qualification, exams.qualification),
                age_limit = COALESCE(EXCLUDED.age_limit, exams.age_limit),
                application_start_date =
                    COALESCE(EXCLUDED.application_start_date, exams.application_start_date),
                application_last_date =
                    COALESCE(EXCLUDED.application_last_date, exams.application_last_date),
                exam_date = COALESCE(EXCLUDED.exam_date, exams.exam_date),
                official_website = COALESCE(EXCLUDED.official_website, exams.official_website),
                notification_pdf = COALESCE(EXCLUDED.notification_pdf, exams.notification_pdf),
                application_fee = COALESCE(EXCLUDED.application_fee, exams.application_fee),
                selection_process = COALESCE(EXCLUDED.selection_process, exams.selection_process),
                status = EXCLUDED.status,
                is_active = true
             RETURNING id, (xmax = 0) AS inserted";
        bind_exam(sqlx::query_as::<_, ExamUpsert>(query), input, status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exams WHERE id = $1");
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of exams, closing deadlines first.
    pub async fn list(
        pool: &PgPool,
        filter: &ExamFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Exam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exams
             WHERE {FILTER}
             ORDER BY application_last_date ASC NULLS LAST, id
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(&filter.level)
            .bind(&filter.status)
            .bind(&filter.state)
            .bind(like_pattern(filter.search.as_deref()))
            .bind(filter.active_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &ExamFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM exams WHERE {FILTER}");
        let (total,): (i64,) = sqlx::query_as(&query)
            .bind(&filter.level)
            .bind(&filter.status)
            .bind(&filter.state)
            .bind(like_pattern(filter.search.as_deref()))
            .bind(filter.active_only)
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Partial update. `status` is the already-resolved status, if any.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExam,
        status: Option<&str>,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!(
            "UPDATE exams SET
                exam_name = COALESCE($2, exam_name),
                organization = COALESCE($3, organization),
                level = COALESCE($4, level),
                state = COALESCE($5, state),
                description = COALESCE($6, description),
                eligibility = COALESCE($7, eligibility),
                qualification = COALESCE($8, qualification),
                age_limit = COALESCE($9, age_limit),
                application_start_date = COALESCE($10, application_start_date),
                application_last_date = COALESCE($11, application_last_date),
                exam_date = COALESCE($12, exam_date),
                official_website = COALESCE($13, official_website),
                notification_pdf = COALESCE($14, notification_pdf),
                application_fee = COALESCE($15, application_fee),
                selection_process = COALESCE($16, selection_process),
                status = COALESCE($17, status),
                is_active = COALESCE($18, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .bind(&input.exam_name)
            .bind(&input.organization)
            .bind(&input.level)
            .bind(&input.state)
            .bind(&input.description)
            .bind(&input.eligibility)
            .bind(&input.qualification)
            .bind(&input.age_limit)
            .bind(input.application_start_date)
            .bind(input.application_last_date)
            .bind(input.exam_date)
            .bind(&input.official_website)
            .bind(&input.notification_pdf)
            .bind(&input.application_fee)
            .bind(&input.selection_process)
            .bind(status)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let query = format!("UPDATE exams SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Exam>, sqlx::Error> {
        let query =
            format!("UPDATE exams SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recompute every exam's status from its dates as of `today`.
    ///
    /// Only rows whose status actually changes are written; the result
    /// counts them by their new status.
    pub async fn refresh_statuses(pool: &PgPool, today: Date) -> Result<StatusRefresh, sqlx::Error> {
        let query = format!(
            "WITH changed AS (
                UPDATE exams SET status = {INFERRED_STATUS}
                WHERE status IS DISTINCT FROM {INFERRED_STATUS}
                RETURNING status
             )
             SELECT
                COUNT(*) FILTER (WHERE status = 'Closed'),
                COUNT(*) FILTER (WHERE status = 'Open'),
                COUNT(*) FILTER (WHERE status = 'Coming Soon')
             FROM changed"
        );
        let (closed_count, opened_count, coming_soon_count): (i64, i64, i64) =
            sqlx::query_as(&query).bind(today).fetch_one(pool).await?;
        Ok(StatusRefresh {
            closed_count,
            opened_count,
            coming_soon_count,
        })
    }

    pub async fn stats(pool: &PgPool) -> Result<ExamStats, sqlx::Error> {
        let (total_active, open, closed, coming_soon): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'Open'),
                COUNT(*) FILTER (WHERE status = 'Closed'),
                COUNT(*) FILTER (WHERE status = 'Coming Soon')
             FROM exams WHERE is_active = true",
        )
        .fetch_one(pool)
        .await?;

        let by_organization = sqlx::query_as::<_, LabelCount>(
            "SELECT organization AS label, COUNT(*) AS count FROM exams
             WHERE is_active = true
             GROUP BY organization ORDER BY count DESC, label",
        )
        .fetch_all(pool)
        .await?;

        let by_level = sqlx::query_as::<_, LabelCount>(
            "SELECT level AS label, COUNT(*) AS count FROM exams
             WHERE is_active = true
             GROUP BY level ORDER BY label",
        )
        .fetch_all(pool)
        .await?;

        Ok(ExamStats {
            total_active,
            open,
            closed,
            coming_soon,
            by_organization,
            by_level,
        })
    }

    // -----------------------------------------------------------------------
    // Saved exams
    // -----------------------------------------------------------------------

    /// Save or unsave an exam. Returns whether it is saved afterwards.
    pub async fn toggle_saved(
        pool: &PgPool,
        student_id: DbId,
        exam_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let removed = sqlx::query("DELETE FROM saved_exams WHERE student_id = $1 AND exam_id = $2")
            .bind(student_id)
            .bind(exam_id)
            .execute(pool)
            .await?;
        if removed.rows_affected() > 0 {
            return Ok(false);
        }
        sqlx::query(
            "INSERT INTO saved_exams (student_id, exam_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_saved_exams_student_id_exam_id DO NOTHING",
        )
        .bind(student_id)
        .bind(exam_id)
        .execute(pool)
        .await?;
        Ok(true)
    }

    /// Active exams saved by a student, most recently saved first.
    pub async fn list_saved(
        pool: &PgPool,
        student_id: DbId,
        filter: &ExamFilter,
    ) -> Result<Vec<Exam>, sqlx::Error> {
        let columns = COLUMNS
            .split(", ")
            .map(|c| format!("e.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {columns} FROM saved_exams s
             JOIN exams e ON e.id = s.exam_id
             WHERE s.student_id = $1
               AND e.is_active = true
               AND ($2::TEXT IS NULL OR e.level = $2)
               AND ($3::TEXT IS NULL OR e.status = $3)
               AND ($4::TEXT IS NULL OR e.exam_name ILIKE $4 OR e.organization ILIKE $4)
             ORDER BY s.created_at DESC"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(student_id)
            .bind(&filter.level)
            .bind(&filter.status)
            .bind(like_pattern(filter.search.as_deref()))
            .fetch_all(pool)
            .await
    }

    pub async fn count_saved(pool: &PgPool, student_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM saved_exams WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Reminders
    // -----------------------------------------------------------------------

    /// Set or clear a reminder. Returns the reminder when it is now set.
    pub async fn toggle_reminder(
        pool: &PgPool,
        student_id: DbId,
        exam_id: DbId,
        reminder_type: &str,
    ) -> Result<Option<ExamReminder>, sqlx::Error> {
        let removed = sqlx::query(
            "DELETE FROM exam_reminders
             WHERE student_id = $1 AND exam_id = $2 AND reminder_type = $3",
        )
        .bind(student_id)
        .bind(exam_id)
        .bind(reminder_type)
        .execute(pool)
        .await?;
        if removed.rows_affected() > 0 {
            return Ok(None);
        }
        let reminder = sqlx::query_as::<_, ExamReminder>(
            "INSERT INTO exam_reminders (student_id, exam_id, reminder_type)
             VALUES ($1, $2, $3)
             RETURNING id, student_id, exam_id, reminder_type, created_at, updated_at",
        )
        .bind(student_id)
        .bind(exam_id)
        .bind(reminder_type)
        .fetch_one(pool)
        .await?;
        Ok(Some(reminder))
    }
}

/// Bind the sixteen insert columns shared by `create` and `upsert`.
fn bind_exam<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    input: &'q CreateExam,
    status: &'q str,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    query
        .bind(input.exam_name.trim())
        .bind(input.organization.trim())
        .bind(&input.level)
        .bind(&input.state)
        .bind(&input.description)
        .bind(&input.eligibility)
        .bind(&input.qualification)
        .bind(&input.age_limit)
        .bind(input.application_start_date)
        .bind(input.application_last_date)
        .bind(input.exam_date)
        .bind(&input.official_website)
        .bind(&input.notification_pdf)
        .bind(&input.application_fee)
        .bind(&input.selection_process)
        .bind(status)
}
