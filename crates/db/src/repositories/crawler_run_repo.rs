//! Repository for `crawler_runs`.

use sqlx::PgPool;
use sangam_core::crawler::STATUS_FAILED;
use sangam_core::types::DbId;

use crate::models::crawler_run::{CrawlerRun, FinishCrawlerRun};

const COLUMNS: &str = "id, run_type, status, scrapers_run, exams_found, exams_new, exams_updated, \
                       exams_closed, errors, error_log, duration_ms, started_at, finished_at, \
                       metadata, created_at, updated_at";

pub struct CrawlerRunRepo;

impl CrawlerRunRepo {
    /// Open a run in `running` state.
    pub async fn start(
        pool: &PgPool,
        run_type: &str,
        scrapers_run: &[String],
    ) -> Result<CrawlerRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO crawler_runs (run_type, scrapers_run)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CrawlerRun>(&query)
            .bind(run_type)
            .bind(scrapers_run)
            .fetch_one(pool)
            .await
    }

    /// Close a run with its final figures.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        input: &FinishCrawlerRun,
    ) -> Result<CrawlerRun, sqlx::Error> {
        let query = format!(
            "UPDATE crawler_runs SET
                status = $2,
                exams_found = $3,
                exams_new = $4,
                exams_updated = $5,
                exams_closed = $6,
                errors = $7,
                error_log = $8,
                duration_ms = $9,
                metadata = $10,
                finished_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CrawlerRun>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(input.exams_found)
            .bind(input.exams_new)
            .bind(input.exams_updated)
            .bind(input.exams_closed)
            .bind(input.errors)
            .bind(&input.error_log)
            .bind(input.duration_ms)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Close a run that aborted before its figures were known.
    pub async fn fail(
        pool: &PgPool,
        id: DbId,
        error: &str,
        duration_ms: i64,
    ) -> Result<CrawlerRun, sqlx::Error> {
        let query = format!(
            "UPDATE crawler_runs SET
                status = $2,
                errors = errors + 1,
                error_log = $3,
                duration_ms = $4,
                finished_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CrawlerRun>(&query)
            .bind(id)
            .bind(STATUS_FAILED)
            .bind(error)
            .bind(duration_ms)
            .fetch_one(pool)
            .await
    }

    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<CrawlerRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM crawler_runs ORDER BY started_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, CrawlerRun>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
