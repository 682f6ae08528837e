//! Periodic exam status recomputation.
//!
//! Application windows open and close as calendar days pass, so exam
//! statuses drift without any write. This job recomputes them on a fixed
//! interval and records each pass as a `scheduled` crawler run.

use std::time::{Duration, Instant};

use chrono::Utc;
use sangam_core::crawler::{STATUS_SUCCESS, STATUS_UPDATER};
use sangam_core::types::DbId;
use sangam_db::models::crawler_run::{CrawlerRun, FinishCrawlerRun};
use sangam_db::models::exam::StatusRefresh;
use sangam_db::repositories::{CrawlerRunRepo, ExamRepo};
use serde_json::json;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Recompute every exam status and record the pass as a crawler run of
/// `run_type`.
///
/// A failure after the run row exists closes it as `failed` before the
/// error is returned.
pub async fn refresh_and_record(
    pool: &PgPool,
    run_type: &str,
) -> Result<(CrawlerRun, StatusRefresh), sqlx::Error> {
    let started = Instant::now();
    let run = CrawlerRunRepo::start(pool, run_type, &[STATUS_UPDATER.to_string()]).await?;

    match refresh_and_finish(pool, run.id, started).await {
        Ok(done) => Ok(done),
        Err(e) => {
            record_failure(pool, run.id, started, &e).await;
            Err(e)
        }
    }
}

async fn refresh_and_finish(
    pool: &PgPool,
    run_id: DbId,
    started: Instant,
) -> Result<(CrawlerRun, StatusRefresh), sqlx::Error> {
    let refresh = ExamRepo::refresh_statuses(pool, Utc::now().date_naive()).await?;

    let finished = CrawlerRunRepo::finish(
        pool,
        run_id,
        &FinishCrawlerRun {
            status: STATUS_SUCCESS.to_string(),
            exams_updated: i32::try_from(refresh.total()).unwrap_or(i32::MAX),
            exams_closed: i32::try_from(refresh.closed_count).unwrap_or(i32::MAX),
            duration_ms: elapsed_ms(started),
            metadata: json!(refresh),
            ..FinishCrawlerRun::default()
        },
    )
    .await?;

    Ok((finished, refresh))
}

/// Close `run_id` as `failed` with `error` in its log.
///
/// Errors here are logged only.
pub async fn record_failure(
    pool: &PgPool,
    run_id: DbId,
    started: Instant,
    error: &impl std::fmt::Display,
) {
    let message = error.to_string();
    match CrawlerRunRepo::fail(pool, run_id, &message, elapsed_ms(started)).await {
        Ok(_) => tracing::warn!(run_id, error = %message, "Crawler run failed"),
        Err(e) => tracing::error!(run_id, error = %e, "Could not mark crawler run failed"),
    }
}

pub fn elapsed_ms(started: Instant) -> i64 {
    i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX)
}

/// Run the exam status refresh loop every `interval_secs` until `cancel`
/// is triggered.
pub async fn run(pool: PgPool, interval_secs: u64, cancel: CancellationToken) {
    let period = Duration::from_secs(interval_secs.max(1));

    tracing::info!(interval_secs = period.as_secs(), "Exam status job started");

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Exam status job stopping");
                break;
            }
            _ = interval.tick() => {
                match refresh_and_record(&pool, sangam_core::crawler::RUN_SCHEDULED).await {
                    Ok((run, refresh)) if refresh.total() > 0 => {
                        tracing::info!(
                            run_id = run.id,
                            closed = refresh.closed_count,
                            opened = refresh.opened_count,
                            coming_soon = refresh.coming_soon_count,
                            "Exam statuses refreshed",
                        );
                    }
                    Ok(_) => {
                        tracing::debug!("Exam status job: no status changes");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Exam status job: refresh failed");
                    }
                }
            }
        }
    }
}
