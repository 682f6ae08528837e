//! Route definitions for community events.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Public events mounted at `/events`.
///
/// ```text
/// GET  /                -> list_events
/// GET  /{id}            -> get_event
/// POST /{id}/register   -> register
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events))
        .route("/{id}", get(events::get_event))
        .route("/{id}/register", post(events::register))
}

/// Event administration, relative to `/admin`.
///
/// ```text
/// GET    /events                      -> admin_list_events
/// POST   /events                      -> create_event
/// PUT    /events/{id}                 -> update_event
/// DELETE /events/{id}                 -> delete_event
/// GET    /events/{id}/registrations   -> list_registrations
/// PUT    /registrations/{id}          -> update_registration
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(events::admin_list_events).post(events::create_event),
        )
        .route(
            "/events/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/events/{id}/registrations", get(events::list_registrations))
        .route("/registrations/{id}", put(events::update_registration))
}
