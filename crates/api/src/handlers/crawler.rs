//! Handlers for exam ingestion from the external scrapers.

use std::time::Instant;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sangam_core::crawler::{run_status, RECENT_RUNS_LIMIT, RUN_MANUAL, RUN_SCHEDULED, RUN_WEBHOOK};
use sangam_core::event_types::CRAWLER_RUN_FINISHED;
use sangam_core::exams::{infer_status, validate_level, validate_status};
use sangam_core::types::DbId;
use sangam_db::models::crawler_run::{CrawlerRun, FinishCrawlerRun};
use sangam_db::models::exam::{CreateExam, ExamStats};
use sangam_db::repositories::{CrawlerRunRepo, ExamRepo};
use sangam_events::PlatformEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::background::exam_status::{elapsed_ms, record_failure, refresh_and_record};
use crate::error::AppResult;
use crate::middleware::cron::{CrawlerCaller, CronOrAdmin, RequireCron};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// One batch of scraper output.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub scrapers: Vec<String>,
    /// Raw rows, decoded one at a time.
    #[serde(default)]
    pub exams: Vec<serde_json::Value>,
    pub stats: Option<serde_json::Value>,
    pub error_log: Option<String>,
}

const MISSING_IDENTITY: &str = "missing exam_name or organization";

#[derive(Debug, Serialize)]
pub struct CrawlerStatus {
    pub runs: Vec<CrawlerRun>,
    pub stats: ExamStats,
}

/// Counts gathered while ingesting a webhook batch.
#[derive(Debug, Default)]
struct IngestTally {
    new: usize,
    updated: usize,
    errors: usize,
    messages: Vec<String>,
}

impl IngestTally {
    fn reject(&mut self, index: usize, reason: impl std::fmt::Display) {
        self.errors += 1;
        self.messages.push(format!("exam #{index}: {reason}"));
    }

    fn ingested(&self) -> usize {
        self.new + self.updated
    }
}

/// POST /api/v1/crawler/webhook
///
/// Upserts each exam by case-insensitive `(exam_name, organization)`, then
/// recomputes every status and records the batch as a `webhook` run.
/// Malformed rows are counted as errors without rejecting the batch.
pub async fn webhook(
    _cron: RequireCron,
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> AppResult<impl IntoResponse> {
    let started = Instant::now();
    let run = CrawlerRunRepo::start(&state.pool, RUN_WEBHOOK, &payload.scrapers).await?;

    let finished = match ingest(&state, run.id, started, payload).await {
        Ok(finished) => finished,
        Err(e) => {
            record_failure(&state.pool, run.id, started, &e).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        run_id = finished.id,
        status = %finished.status,
        found = finished.exams_found,
        new = finished.exams_new,
        updated = finished.exams_updated,
        errors = finished.errors,
        "Crawler webhook ingested",
    );
    publish_finished(&state, &finished);

    Ok(Json(DataResponse { data: finished }))
}

async fn ingest(
    state: &AppState,
    run_id: DbId,
    started: Instant,
    payload: WebhookPayload,
) -> Result<CrawlerRun, sqlx::Error> {
    let today = Utc::now().date_naive();
    let exams_found = payload.exams.len();

    let mut tally = IngestTally::default();
    for (index, row) in payload.exams.into_iter().enumerate() {
        let exam = match parse_row(row) {
            Ok(exam) => exam,
            Err(reason) => {
                tally.reject(index, reason);
                continue;
            }
        };
        let status = match exam.status.as_deref() {
            Some(status) if validate_status(status).is_ok() => status,
            _ => infer_status(exam.application_start_date, exam.application_last_date, today),
        };
        match ExamRepo::upsert(&state.pool, &exam, status).await {
            Ok(upsert) if upsert.inserted => tally.new += 1,
            Ok(_) => tally.updated += 1,
            Err(e) => {
                tracing::warn!(error = %e, exam = %exam.exam_name, "Exam upsert failed");
                tally.reject(index, e);
            }
        }
    }

    let refresh = ExamRepo::refresh_statuses(&state.pool, today).await?;

    let error_log = payload
        .error_log
        .into_iter()
        .chain(tally.messages.iter().cloned())
        .collect::<Vec<_>>();
    CrawlerRunRepo::finish(
        &state.pool,
        run_id,
        &FinishCrawlerRun {
            status: run_status(tally.ingested(), tally.errors).to_string(),
            exams_found: to_i32(exams_found),
            exams_new: to_i32(tally.new),
            exams_updated: to_i32(tally.updated),
            exams_closed: i32::try_from(refresh.closed_count).unwrap_or(i32::MAX),
            errors: to_i32(tally.errors),
            error_log: (!error_log.is_empty()).then(|| error_log.join("\n")),
            duration_ms: elapsed_ms(started),
            metadata: json!({ "stats": payload.stats, "refresh": refresh }),
        },
    )
    .await
}

/// Decode and check one scraper row.
fn parse_row(row: serde_json::Value) -> Result<CreateExam, String> {
    let exam = serde_json::from_value::<CreateExam>(row).map_err(|e| e.to_string())?;
    if exam.exam_name.trim().is_empty() || exam.organization.trim().is_empty() {
        return Err(MISSING_IDENTITY.to_string());
    }
    if let Some(level) = exam.level.as_deref() {
        validate_level(level).map_err(|e| e.to_string())?;
    }
    Ok(exam)
}

/// POST /api/v1/crawler/run
///
/// Status-only refresh. Recorded as `scheduled` for the cron caller and
/// `manual` for an admin.
pub async fn run_now(
    CronOrAdmin(caller): CronOrAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let run_type = match &caller {
        CrawlerCaller::Cron => RUN_SCHEDULED,
        CrawlerCaller::Admin(_) => RUN_MANUAL,
    };
    let (run, refresh) = refresh_and_record(&state.pool, run_type).await?;

    tracing::info!(
        run_id = run.id,
        run_type,
        changed = refresh.total(),
        "Exam status refresh run",
    );
    publish_finished(&state, &run);

    Ok(Json(DataResponse { data: run }))
}

/// GET /api/v1/admin/crawler/status
pub async fn status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let runs = CrawlerRunRepo::list_recent(&state.pool, RECENT_RUNS_LIMIT).await?;
    let stats = ExamRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse {
        data: CrawlerStatus { runs, stats },
    }))
}

fn publish_finished(state: &AppState, run: &CrawlerRun) {
    state.event_bus.publish(
        PlatformEvent::new(CRAWLER_RUN_FINISHED)
            .with_source("crawler_run", run.id)
            .with_payload(json!({
                "run_type": run.run_type,
                "status": run.status,
                "exams_new": run.exams_new,
                "exams_updated": run.exams_updated,
                "errors": run.errors,
            })),
    );
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
