//! Route definitions for donated books.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::book_donations;
use crate::state::AppState;

/// Public submission mounted at `/book-donations`.
///
/// ```text
/// POST / -> submit
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(book_donations::submit))
}

/// Admin routes mounted at `/admin/book-donations`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /stats         -> stats
/// GET    /export        -> export
/// PUT    /{id}/status   -> update_status
/// PUT    /{id}/notes    -> update_notes
/// DELETE /{id}          -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(book_donations::list).post(book_donations::create),
        )
        .route("/stats", get(book_donations::stats))
        .route("/export", get(book_donations::export))
        .route("/{id}/status", put(book_donations::update_status))
        .route("/{id}/notes", put(book_donations::update_notes))
        .route("/{id}", delete(book_donations::delete))
}
