//! Route definitions for fundraising campaigns and donations.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::donations;
use crate::state::AppState;

/// Public campaigns mounted at `/campaigns`.
///
/// ```text
/// GET /       -> list_campaigns
/// GET /{id}   -> get_campaign
/// ```
pub fn campaign_router() -> Router<AppState> {
    Router::new()
        .route("/", get(donations::list_campaigns))
        .route("/{id}", get(donations::get_campaign))
}

/// Public donations mounted at `/donations`.
///
/// ```text
/// POST /        -> create_donation
/// GET  /stats   -> donation_stats
/// ```
pub fn donation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(donations::create_donation))
        .route("/stats", get(donations::donation_stats))
}

/// Admin campaigns mounted at `/admin/campaigns`.
///
/// ```text
/// GET    /                     -> admin_list_campaigns
/// POST   /                     -> create_campaign
/// PUT    /{id}                 -> update_campaign
/// DELETE /{id}                 -> delete_campaign
/// POST   /{id}/toggle-active   -> toggle_campaign_active
/// ```
pub fn admin_campaign_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(donations::admin_list_campaigns).post(donations::create_campaign),
        )
        .route(
            "/{id}",
            put(donations::update_campaign).delete(donations::delete_campaign),
        )
        .route("/{id}/toggle-active", post(donations::toggle_campaign_active))
}

/// Admin donations mounted at `/admin/donations`.
///
/// ```text
/// GET  /              -> admin_list_donations
/// POST /              -> admin_create_donation
/// GET  /export        -> export_donations
/// PUT  /{id}/status   -> update_donation_status
/// ```
pub fn admin_donation_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(donations::admin_list_donations).post(donations::admin_create_donation),
        )
        .route("/export", get(donations::export_donations))
        .route("/{id}/status", put(donations::update_donation_status))
}
