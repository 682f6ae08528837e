//! Route definitions for exam listings.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::exams;
use crate::state::AppState;

/// Exam browsing mounted at `/exams`.
///
/// ```text
/// GET  /                 -> list_exams
/// GET  /{id}             -> get_exam
/// POST /{id}/save        -> toggle_saved (auth)
/// POST /{id}/reminders   -> toggle_reminder (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(exams::list_exams))
        .route("/{id}", get(exams::get_exam))
        .route("/{id}/save", post(exams::toggle_saved))
        .route("/{id}/reminders", post(exams::toggle_reminder))
}

/// Exam maintenance mounted at `/admin/exams`.
///
/// ```text
/// GET    /                     -> admin_list_exams
/// POST   /                     -> create_exam
/// PUT    /{id}                 -> update_exam
/// DELETE /{id}                 -> delete_exam
/// PUT    /{id}/status          -> set_status
/// POST   /{id}/toggle-active   -> toggle_active
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(exams::admin_list_exams).post(exams::create_exam),
        )
        .route(
            "/{id}",
            put(exams::update_exam).delete(exams::delete_exam),
        )
        .route("/{id}/status", put(exams::set_status))
        .route("/{id}/toggle-active", post(exams::toggle_active))
}
