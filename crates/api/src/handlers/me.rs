//! The signed-in user's dashboard: their registrations, donations, library
//! loans and notifications.
//!
//! Rows created before sign-up (guest registrations, patron records) are
//! matched by the account's email as well as its id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::event_types::REGISTRATION_CANCELLED;
use sangam_core::types::DbId;
use sangam_db::models::donation::DonationFilter;
use sangam_db::repositories::{
    AnalyticsRepo, BookIssueRepo, DonationRepo, EventRepo, NotificationRepo, PatronRepo,
};
use sangam_events::PlatformEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::handlers::auth::load_profile;
use crate::middleware::rbac::RequireAuth;
use crate::notifications::router::RECIPIENT_KEY;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

/// GET /api/v1/me/summary
pub async fn summary(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = load_profile(&state, user.user_id).await?;
    let summary = AnalyticsRepo::user_summary(&state.pool, profile.id, &profile.email).await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Event registrations
// ---------------------------------------------------------------------------

/// GET /api/v1/me/registrations
pub async fn registrations(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = load_profile(&state, user.user_id).await?;
    let registrations =
        EventRepo::list_registrations_for_user(&state.pool, profile.id, &profile.email).await?;
    Ok(Json(DataResponse {
        data: registrations,
    }))
}

/// POST /api/v1/me/registrations/{id}/cancel
///
/// Frees the seat. Someone else's registration is reported as missing.
pub async fn cancel_registration(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = load_profile(&state, user.user_id).await?;
    let registration = EventRepo::cancel_for_user(&state.pool, id, profile.id, &profile.email)
        .await?
        .ok_or_else(|| not_found("EventRegistration", id))?;

    let event_title = EventRepo::find_by_id(&state.pool, registration.event_id)
        .await?
        .map(|event| event.title)
        .unwrap_or_default();

    tracing::info!(
        registration_id = id,
        event_id = registration.event_id,
        user_id = user.user_id,
        "Registration cancelled",
    );
    state.event_bus.publish(
        PlatformEvent::new(REGISTRATION_CANCELLED)
            .with_source("event_registration", id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "event_id": registration.event_id,
                "event_title": event_title,
                RECIPIENT_KEY: user.user_id,
            })),
    );

    Ok(Json(DataResponse { data: registration }))
}

// ---------------------------------------------------------------------------
// Donations and library
// ---------------------------------------------------------------------------

/// GET /api/v1/me/donations
pub async fn donations(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let filter = DonationFilter {
        user_id: Some(user.user_id),
        ..DonationFilter::default()
    };
    let donations = DonationRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: donations }))
}

/// GET /api/v1/me/books
///
/// Loans of the library patron linked to this account. Empty when the
/// account has no patron record.
pub async fn books(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = load_profile(&state, user.user_id).await?;
    let issues = match PatronRepo::find_for_user(&state.pool, profile.id, &profile.email).await? {
        Some(patron) => BookIssueRepo::list_for_patron(&state.pool, patron.id).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: issues }))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// GET /api/v1/me/notifications
pub async fn list_notifications(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let notifications =
        NotificationRepo::list_for_user(&state.pool, user.user_id, params.unread_only, limit, offset)
            .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/me/notifications/{id}/read
///
/// Idempotent: an already-read notification is still 204.
pub async fn mark_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    NotificationRepo::mark_read(&state.pool, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/me/notifications/read-all
pub async fn mark_all_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let updated = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    tracing::debug!(user_id = user.user_id, updated, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkedRead { updated },
    }))
}
