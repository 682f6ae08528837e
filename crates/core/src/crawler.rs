//! Exam crawler run bookkeeping.

pub const RUN_WEBHOOK: &str = "webhook";
pub const RUN_SCHEDULED: &str = "scheduled";
pub const RUN_MANUAL: &str = "manual";

pub const STATUS_RUNNING: &str = "running";
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_PARTIAL: &str = "partial";
pub const STATUS_FAILED: &str = "failed";

/// Name recorded in `scrapers_run` for status-only refreshes.
pub const STATUS_UPDATER: &str = "status-updater";

/// Number of recent runs shown on the admin status page.
pub const RECENT_RUNS_LIMIT: i64 = 10;

/// Final status of an ingest run.
///
/// No errors is `success`; errors with at least one row ingested is
/// `partial`; errors with nothing ingested is `failed`.
pub fn run_status(ingested: usize, errors: usize) -> &'static str {
    match (ingested, errors) {
        (_, 0) => STATUS_SUCCESS,
        (0, _) => STATUS_FAILED,
        _ => STATUS_PARTIAL,
    }
}
