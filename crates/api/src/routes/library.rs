//! Route definitions for library staff, mounted at `/library`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{books, library};
use crate::state::AppState;

/// ```text
/// POST   /books                  -> books::create_book
/// PUT    /books/{id}             -> books::update_book
/// DELETE /books/{id}             -> books::delete_book
/// GET    /patrons                -> list_patrons
/// POST   /patrons                -> create_patron
/// GET    /patrons/{id}           -> get_patron
/// PUT    /patrons/{id}           -> update_patron
/// DELETE /patrons/{id}           -> deactivate_patron
/// GET    /issues                 -> list_issues
/// POST   /issues                 -> issue_book
/// POST   /issues/{id}/return     -> return_book
/// POST   /issues/{id}/pay-fine   -> pay_fine
/// GET    /overdue                -> list_overdue
/// GET    /dashboard              -> dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", post(books::create_book))
        .route(
            "/books/{id}",
            put(books::update_book).delete(books::delete_book),
        )
        .route(
            "/patrons",
            get(library::list_patrons).post(library::create_patron),
        )
        .route(
            "/patrons/{id}",
            get(library::get_patron)
                .put(library::update_patron)
                .delete(library::deactivate_patron),
        )
        .route(
            "/issues",
            get(library::list_issues).post(library::issue_book),
        )
        .route("/issues/{id}/return", post(library::return_book))
        .route("/issues/{id}/pay-fine", post(library::pay_fine))
        .route("/overdue", get(library::list_overdue))
        .route("/dashboard", get(library::dashboard))
}
