//! Crawler run history.

use serde::Serialize;
use sangam_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CrawlerRun {
    pub id: DbId,
    pub run_type: String,
    pub status: String,
    pub scrapers_run: Vec<String>,
    pub exams_found: i32,
    pub exams_new: i32,
    pub exams_updated: i32,
    pub exams_closed: i32,
    pub errors: i32,
    pub error_log: Option<String>,
    pub duration_ms: Option<i64>,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Final figures written when a run completes.
#[derive(Debug, Default)]
pub struct FinishCrawlerRun {
    pub status: String,
    pub exams_found: i32,
    pub exams_new: i32,
    pub exams_updated: i32,
    pub exams_closed: i32,
    pub errors: i32,
    pub error_log: Option<String>,
    pub duration_ms: i64,
    pub metadata: serde_json::Value,
}
