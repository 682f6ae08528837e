//! Handlers for community events and their registrations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::error::CoreError;
use sangam_core::event_types::EVENT_REGISTERED;
use sangam_core::events::{
    validate_capacity, validate_registration_status, validate_schedule, validate_status,
    validate_type,
};
use sangam_core::types::DbId;
use sangam_core::validation::{
    normalize_email, require_non_empty, slugify, validate_email, validate_max_length,
    MAX_NAME_LENGTH,
};
use sangam_db::models::event::{
    CreateEvent, CreateRegistration, EventFilter, UpdateEvent, UpdateRegistration,
};
use sangam_db::repositories::EventRepo;
use sangam_events::PlatformEvent;
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::router::RECIPIENT_KEY;
use crate::query::{non_blank, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events
///
/// Published events, soonest first.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let filter = EventFilter {
        status: non_blank(params.status),
        published_only: true,
    };
    let events = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
///
/// Unpublished events are reported as missing.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|e| e.is_published)
        .ok_or_else(|| not_found("Event", id))?;
    Ok(Json(DataResponse { data: event }))
}

/// POST /api/v1/events/{id}/register
///
/// Register for a published event. Capacity, event status and duplicate
/// emails are checked in the same transaction that bumps the count.
pub async fn register(
    caller: OptionalAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<CreateRegistration>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("name", &input.name)?;
    validate_max_length("name", &input.name, MAX_NAME_LENGTH)?;
    input.email = normalize_email(&input.email);
    validate_email(&input.email)?;

    let registration = EventRepo::register(&state.pool, id, &input, caller.user_id()).await?;
    let event_title = EventRepo::find_by_id(&state.pool, id)
        .await?
        .map(|e| e.title)
        .unwrap_or_default();

    tracing::info!(
        event_id = id,
        registration_id = registration.id,
        user_id = ?caller.user_id(),
        "Event registration created",
    );

    let mut payload = json!({ "event_id": id, "event_title": event_title });
    if let Some(user_id) = caller.user_id() {
        payload[RECIPIENT_KEY] = json!(user_id);
    }
    state.event_bus.publish(
        PlatformEvent::new(EVENT_REGISTERED)
            .with_source("event_registration", registration.id)
            .with_optional_actor(caller.user_id())
            .with_payload(payload),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: registration })))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

fn validate_event_fields(
    event_type: Option<&str>,
    status: Option<&str>,
    capacity: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(event_type) = event_type {
        validate_type(event_type)?;
    }
    if let Some(status) = status {
        validate_status(status)?;
    }
    validate_capacity(capacity)
}

/// GET /api/v1/admin/events
///
/// All events including drafts.
pub async fn admin_list_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let filter = EventFilter {
        status: non_blank(params.status),
        published_only: false,
    };
    let events = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/admin/events
pub async fn create_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("title", &input.title)?;
    validate_max_length("title", &input.title, MAX_NAME_LENGTH)?;
    validate_event_fields(
        input.event_type.as_deref(),
        input.status.as_deref(),
        input.capacity,
    )?;
    validate_schedule(input.start_date, input.end_date)?;

    let slug = slugify(input.slug.as_deref().unwrap_or(&input.title));
    if slug.is_empty() {
        return Err(CoreError::Validation("slug must contain letters or digits".into()).into());
    }

    let event = EventRepo::create(&state.pool, &input, &slug, admin.user_id).await?;
    tracing::info!(
        event_id = event.id,
        slug = %event.slug,
        user_id = admin.user_id,
        "Event created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PUT /api/v1/admin/events/{id}
pub async fn update_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_empty("title", title)?;
    }
    validate_event_fields(
        input.event_type.as_deref(),
        input.status.as_deref(),
        input.capacity,
    )?;
    if let Some(slug) = input.slug.take() {
        let slug = slugify(&slug);
        if slug.is_empty() {
            return Err(CoreError::Validation("slug must contain letters or digits".into()).into());
        }
        input.slug = Some(slug);
    }

    let existing = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Event", id))?;
    validate_schedule(
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    if let Some(capacity) = input.capacity {
        if capacity < existing.registered_count {
            return Err(CoreError::Conflict(format!(
                "capacity {capacity} is below the {} seats already taken",
                existing.registered_count
            ))
            .into());
        }
    }

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Event", id))?;
    tracing::info!(event_id = id, user_id = admin.user_id, "Event updated");
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/admin/events/{id}
pub async fn delete_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EventRepo::delete(&state.pool, id).await? {
        return Err(not_found("Event", id));
    }
    tracing::info!(event_id = id, user_id = admin.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/events/{id}/registrations
pub async fn list_registrations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if EventRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found("Event", id));
    }
    let registrations = EventRepo::list_registrations(&state.pool, id).await?;
    Ok(Json(DataResponse { data: registrations }))
}

/// PUT /api/v1/admin/registrations/{id}
///
/// Change status or attendance. Seats are released or re-taken as the
/// status moves in and out of `cancelled`.
pub async fn update_registration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRegistration>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        validate_registration_status(status)?;
    }
    let registration = EventRepo::update_registration(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("EventRegistration", id))?;
    tracing::info!(
        registration_id = id,
        status = %registration.status,
        user_id = admin.user_id,
        "Registration updated",
    );
    Ok(Json(DataResponse { data: registration }))
}
