//! Route definitions for site content.
//!
//! - `public_router()` is mounted at `/site`
//! - `admin_router()` is merged into `/admin`

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// Public site content mounted at `/site`.
///
/// ```text
/// GET  /settings       -> public_settings
/// GET  /hero           -> public_hero
/// GET  /stats          -> public_stats
/// GET  /overview       -> overview
/// GET  /testimonials   -> public_testimonials
/// POST /testimonials   -> submit_testimonial
/// POST /contact        -> submit_contact
/// GET  /members        -> public_members
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(site::public_settings))
        .route("/hero", get(site::public_hero))
        .route("/stats", get(site::public_stats))
        .route("/overview", get(site::overview))
        .route(
            "/testimonials",
            get(site::public_testimonials).post(site::submit_testimonial),
        )
        .route("/contact", post(site::submit_contact))
        .route("/members", get(site::public_members))
}

/// Site administration, relative to `/admin`.
///
/// ```text
/// GET    /settings                            -> list_settings
/// PUT    /settings/{key}                      -> upsert_setting
/// GET    /hero                                -> list_hero
/// POST   /hero                                -> create_hero
/// PUT    /hero/{id}                           -> update_hero
/// DELETE /hero/{id}                           -> delete_hero
/// GET    /stats                               -> list_stats
/// POST   /stats                               -> create_stat
/// PUT    /stats/{id}                          -> update_stat
/// DELETE /stats/{id}                          -> delete_stat
/// GET    /testimonials                        -> list_testimonials
/// POST   /testimonials                        -> create_testimonial
/// PUT    /testimonials/{id}                   -> update_testimonial
/// DELETE /testimonials/{id}                   -> delete_testimonial
/// POST   /testimonials/{id}/toggle-approved   -> toggle_testimonial_approved
/// POST   /testimonials/{id}/toggle-featured   -> toggle_testimonial_featured
/// GET    /contact                             -> list_contact
/// PUT    /contact/{id}                        -> update_contact
/// DELETE /contact/{id}                        -> delete_contact
/// GET    /members                             -> list_members
/// POST   /members                             -> create_member
/// PUT    /members/{id}                        -> update_member
/// DELETE /members/{id}                        -> deactivate_member
/// POST   /members/{id}/approve                -> approve_member
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(site::list_settings))
        .route("/settings/{key}", put(site::upsert_setting))
        .route("/hero", get(site::list_hero).post(site::create_hero))
        .route(
            "/hero/{id}",
            put(site::update_hero).delete(site::delete_hero),
        )
        .route("/stats", get(site::list_stats).post(site::create_stat))
        .route(
            "/stats/{id}",
            put(site::update_stat).delete(site::delete_stat),
        )
        .route(
            "/testimonials",
            get(site::list_testimonials).post(site::create_testimonial),
        )
        .route(
            "/testimonials/{id}",
            put(site::update_testimonial).delete(site::delete_testimonial),
        )
        .route(
            "/testimonials/{id}/toggle-approved",
            post(site::toggle_testimonial_approved),
        )
        .route(
            "/testimonials/{id}/toggle-featured",
            post(site::toggle_testimonial_featured),
        )
        .route("/contact", get(site::list_contact))
        .route(
            "/contact/{id}",
            put(site::update_contact).delete(site::delete_contact),
        )
        .route("/members", get(site::list_members).post(site::create_member))
        .route(
            "/members/{id}",
            put(site::update_member).delete(site::deactivate_member),
        )
        .route("/members/{id}/approve", post(site::approve_member))
}
