//! Admin handlers for user accounts, platform analytics and the activity
//! log.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::event_types::USER_UPDATED;
use sangam_core::roles::{validate_role, ROLE_ADMIN};
use sangam_core::types::DbId;
use sangam_db::models::profile::{AdminUpdateProfile, Profile, ProfileResponse};
use sangam_db::repositories::{ActivityRepo, AnalyticsRepo, ProfileFilter, ProfileRepo, SessionRepo};
use sangam_events::PlatformEvent;
use serde::Deserialize;
use serde_json::json;

use crate::error::{not_found, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{non_blank, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    pub entity_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = ProfileFilter {
        role: non_blank(params.role),
        is_active: params.is_active,
        search: non_blank(params.search),
    };
    let users: Vec<ProfileResponse> = ProfileRepo::list(&state.pool, &filter, limit, offset)
        .await?
        .into_iter()
        .map(ProfileResponse::from)
        .collect();
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/counts
pub async fn user_counts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = ProfileRepo::counts(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Profile", id))?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(user),
    }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(role) = &input.role {
        validate_role(role)?;
        guard_self_demotion(&admin, id, role)?;
    }
    if input.is_active == Some(false) {
        guard_self_deactivation(&admin, id)?;
    }

    let user = ProfileRepo::admin_update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Profile", id))?;

    after_account_change(&state, &admin, &user, "User updated").await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(user),
    }))
}

/// POST /api/v1/admin/users/{id}/toggle-active
pub async fn toggle_active(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    guard_self_deactivation(&admin, id)?;

    let user = ProfileRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Profile", id))?;

    after_account_change(&state, &admin, &user, "User active flag toggled").await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(user),
    }))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RoleUpdate>,
) -> AppResult<impl IntoResponse> {
    validate_role(&input.role)?;
    guard_self_demotion(&admin, id, &input.role)?;

    let user = ProfileRepo::set_role(&state.pool, id, &input.role)
        .await?
        .ok_or_else(|| not_found("Profile", id))?;

    after_account_change(&state, &admin, &user, "User role changed").await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(user),
    }))
}

// ---------------------------------------------------------------------------
// Analytics and activity
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/analytics
pub async fn analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let analytics = AnalyticsRepo::analytics(&state.pool).await?;
    Ok(Json(DataResponse { data: analytics }))
}

/// GET /api/v1/admin/activity
pub async fn activity(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let entity_type = non_blank(params.entity_type);
    let entries = ActivityRepo::list(&state.pool, entity_type.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn guard_self_deactivation(admin: &AuthUser, target: DbId) -> AppResult<()> {
    if admin.user_id == target {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }
    Ok(())
}

fn guard_self_demotion(admin: &AuthUser, target: DbId, role: &str) -> AppResult<()> {
    if admin.user_id == target && role != ROLE_ADMIN {
        return Err(AppError::BadRequest("You cannot remove your own admin role".into()));
    }
    Ok(())
}

/// Log and publish an account change. Deactivated accounts lose their
/// sessions.
async fn after_account_change(
    state: &AppState,
    admin: &AuthUser,
    user: &Profile,
    message: &'static str,
) -> AppResult<()> {
    if !user.is_active {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
        tracing::debug!(target_user_id = user.id, revoked, "Sessions revoked");
    }

    tracing::info!(
        target_user_id = user.id,
        role = %user.role,
        is_active = user.is_active,
        user_id = admin.user_id,
        "{message}",
    );
    state.event_bus.publish(
        PlatformEvent::new(USER_UPDATED)
            .with_source("profile", user.id)
            .with_actor(admin.user_id)
            .with_payload(json!({ "role": user.role, "is_active": user.is_active })),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn admin(id: DbId) -> AuthUser {
        AuthUser {
            user_id: id,
            role: ROLE_ADMIN.to_string(),
        }
    }

    #[test]
    fn admins_cannot_lock_themselves_out() {
        assert_matches!(guard_self_deactivation(&admin(1), 1), Err(AppError::BadRequest(_)));
        assert!(guard_self_deactivation(&admin(1), 2).is_ok());
    }

    #[test]
    fn admins_cannot_demote_themselves() {
        assert_matches!(guard_self_demotion(&admin(1), 1, "user"), Err(AppError::BadRequest(_)));
        assert!(guard_self_demotion(&admin(1), 1, ROLE_ADMIN).is_ok());
        assert!(guard_self_demotion(&admin(1), 2, "user").is_ok());
    }
}
