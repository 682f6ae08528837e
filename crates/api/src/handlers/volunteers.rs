//! Handlers for volunteer applications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::event_types::{VOLUNTEER_APPLIED, VOLUNTEER_REVIEWED};
use sangam_core::types::DbId;
use sangam_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_length, MAX_NAME_LENGTH,
};
use sangam_core::volunteers::{is_decision, validate_status};
use sangam_db::models::volunteer::{CreateVolunteerApplication, ReviewVolunteerApplication};
use sangam_db::repositories::VolunteerRepo;
use sangam_events::PlatformEvent;
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::router::RECIPIENT_KEY;
use crate::query::{non_blank, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/volunteer-applications
pub async fn apply(
    caller: OptionalAuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateVolunteerApplication>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("name", &input.name)?;
    validate_max_length("name", &input.name, MAX_NAME_LENGTH)?;
    input.email = normalize_email(&input.email);
    validate_email(&input.email)?;
    require_non_empty("phone", &input.phone)?;

    let application = VolunteerRepo::create(&state.pool, &input, caller.user_id()).await?;

    tracing::info!(
        application_id = application.id,
        user_id = ?caller.user_id(),
        "Volunteer application received",
    );
    state.event_bus.publish(
        PlatformEvent::new(VOLUNTEER_APPLIED)
            .with_source("volunteer_application", application.id)
            .with_optional_actor(caller.user_id()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/admin/volunteers
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let status = non_blank(params.status);
    let applications = VolunteerRepo::list(&state.pool, status.as_deref()).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// PUT /api/v1/admin/volunteers/{id}
///
/// Record a review decision and notes. The reviewer and time are stamped.
pub async fn review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewVolunteerApplication>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    let application = VolunteerRepo::review(&state.pool, id, &input, admin.user_id)
        .await?
        .ok_or_else(|| not_found("VolunteerApplication", id))?;

    tracing::info!(
        application_id = id,
        status = %application.status,
        user_id = admin.user_id,
        "Volunteer application reviewed",
    );

    if is_decision(&application.status) {
        let mut payload = json!({ "status": application.status });
        if let Some(applicant) = application.user_id {
            payload[RECIPIENT_KEY] = json!(applicant);
        }
        state.event_bus.publish(
            PlatformEvent::new(VOLUNTEER_REVIEWED)
                .with_source("volunteer_application", id)
                .with_actor(admin.user_id)
                .with_payload(payload),
        );
    }

    Ok(Json(DataResponse { data: application }))
}

/// DELETE /api/v1/admin/volunteers/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !VolunteerRepo::delete(&state.pool, id).await? {
        return Err(not_found("VolunteerApplication", id));
    }
    tracing::info!(application_id = id, user_id = admin.user_id, "Volunteer application deleted");
    Ok(StatusCode::NO_CONTENT)
}
