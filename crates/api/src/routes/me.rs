//! Route definitions for the signed-in user's dashboard, mounted at `/me`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{exams, me};
use crate::state::AppState;

/// ```text
/// GET  /summary                     -> summary
/// GET  /registrations               -> registrations
/// POST /registrations/{id}/cancel   -> cancel_registration
/// GET  /donations                   -> donations
/// GET  /books                       -> books
/// GET  /saved-exams                 -> exams::list_saved
/// GET  /notifications               -> list_notifications
/// POST /notifications/read-all      -> mark_all_read
/// POST /notifications/{id}/read     -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(me::summary))
        .route("/registrations", get(me::registrations))
        .route("/registrations/{id}/cancel", post(me::cancel_registration))
        .route("/donations", get(me::donations))
        .route("/books", get(me::books))
        .route("/saved-exams", get(exams::list_saved))
        .route("/notifications", get(me::list_notifications))
        .route("/notifications/read-all", post(me::mark_all_read))
        .route("/notifications/{id}/read", post(me::mark_read))
}
