//! Route definitions for the public book catalogue, mounted at `/books`.

use axum::routing::get;
use axum::Router;

use crate::handlers::books;
use crate::state::AppState;

/// ```text
/// GET /        -> list_books
/// GET /stats   -> book_stats
/// GET /{id}    -> get_book
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::list_books))
        .route("/stats", get(books::book_stats))
        .route("/{id}", get(books::get_book))
}
