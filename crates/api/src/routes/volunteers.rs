//! Route definitions for volunteer applications.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::volunteers;
use crate::state::AppState;

/// Public applications mounted at `/volunteer-applications`.
///
/// ```text
/// POST / -> apply
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(volunteers::apply))
}

/// Review queue mounted at `/admin/volunteers`.
///
/// ```text
/// GET    /       -> list
/// PUT    /{id}   -> review
/// DELETE /{id}   -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(volunteers::list))
        .route("/{id}", put(volunteers::review).delete(volunteers::delete))
}
