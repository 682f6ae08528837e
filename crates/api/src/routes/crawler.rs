//! Route definitions for scraper ingestion, mounted at `/crawler`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::crawler;
use crate::state::AppState;

/// ```text
/// POST /webhook   -> webhook (cron secret)
/// POST /run       -> run_now (cron secret or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(crawler::webhook))
        .route("/run", post(crawler::run_now))
}

/// Run history mounted at `/admin/crawler`.
///
/// ```text
/// GET /status -> status
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/status", get(crawler::status))
}
