//! Route definitions for the admin surface, mounted at `/admin`.
//!
//! User management, analytics and the activity log live here; every other
//! area contributes its own admin router.

use axum::routing::{get, post, put};
use axum::Router;

use super::{
    book_donations, community, crawler, donations, events, exams, site, transparency, volunteers,
};
use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET  /users                     -> list_users
/// GET  /users/counts              -> user_counts
/// GET  /users/{id}                -> get_user
/// PUT  /users/{id}                -> update_user
/// POST /users/{id}/toggle-active  -> toggle_active
/// PUT  /users/{id}/role           -> set_role
/// GET  /analytics                 -> analytics
/// GET  /activity                  -> activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/counts", get(admin::user_counts))
        .route(
            "/users/{id}",
            get(admin::get_user).put(admin::update_user),
        )
        .route("/users/{id}/toggle-active", post(admin::toggle_active))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/analytics", get(admin::analytics))
        .route("/activity", get(admin::activity))
        .merge(site::admin_router())
        .merge(events::admin_router())
        .nest("/book-donations", book_donations::admin_router())
        .nest("/campaigns", donations::admin_campaign_router())
        .nest("/donations", donations::admin_donation_router())
        .nest("/transactions", transparency::admin_router())
        .nest("/volunteers", volunteers::admin_router())
        .nest("/exams", exams::admin_router())
        .nest("/crawler", crawler::admin_router())
        .nest("/community", community::admin_router())
}
