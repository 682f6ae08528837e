//! Handlers for the `/auth` resource (signup, login, refresh, logout,
//! password reset and the caller's own profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sangam_core::error::CoreError;
use sangam_core::event_types::{PASSWORD_RESET_REQUESTED, USER_SIGNED_UP, USER_UPDATED};
use sangam_core::roles::ROLE_USER;
use sangam_core::tokens::{generate_token, hash_token, RESET_TOKEN_TTL_MINS};
use sangam_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_length, MAX_NAME_LENGTH,
};
use sangam_db::models::profile::{CreateProfile, Profile, ProfileResponse, UpdateOwnProfile};
use sangam_db::models::session::CreateSession;
use sangam_db::repositories::{PasswordResetRepo, ProfileRepo, SessionRepo};
use sangam_events::delivery::email::password_reset_message;
use sangam_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by signup, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: ProfileResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create a `user` account and sign it in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    validate_email(&email)?;
    require_non_empty("full_name", &input.full_name)?;
    validate_max_length("full_name", &input.full_name, MAX_NAME_LENGTH)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if ProfileRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            email,
            password_hash,
            full_name: input.full_name.trim().to_string(),
            phone: input.phone,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = profile.id, "Account created");
    state.event_bus.publish(
        PlatformEvent::new(USER_SIGNED_UP)
            .with_source("profile", profile.id)
            .with_actor(profile.id),
    );

    let response = create_auth_response(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    let user = ProfileRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        ProfileRepo::increment_failed_login(&state.pool, user.id).await?;

        let new_count = user.failed_login_count + 1;
        if new_count >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            ProfileRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, "Account locked after failed logins");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    ProfileRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Rotation: the presented token is single-use.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = ProfileRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/forgot-password
///
/// Always 202, whether or not the email belongs to an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    let email = normalize_email(&input.email);
    let Some(user) = ProfileRepo::find_by_email(&state.pool, &email).await? else {
        tracing::debug!("Password reset requested for unknown email");
        return Ok(StatusCode::ACCEPTED);
    };
    if !user.is_active {
        return Ok(StatusCode::ACCEPTED);
    }

    PasswordResetRepo::invalidate_for_user(&state.pool, user.id).await?;
    let token = generate_token();
    let expires_at = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINS);
    PasswordResetRepo::create(&state.pool, user.id, &token.hash, expires_at).await?;

    tracing::info!(user_id = user.id, "Password reset token issued");
    state.event_bus.publish(
        PlatformEvent::new(PASSWORD_RESET_REQUESTED)
            .with_source("profile", user.id)
            .with_actor(user.id),
    );

    match state.mailer.clone() {
        Some(mailer) => {
            let link = format!(
                "{}/reset-password?token={}",
                state.config.app_base_url, token.plaintext
            );
            let message = password_reset_message(&user.full_name, &link);
            tokio::spawn(async move {
                if let Err(e) = mailer.send(&user.email, &message).await {
                    tracing::error!(user_id = user.id, error = %e, "Password reset mail failed");
                }
            });
        }
        None => {
            tracing::warn!(user_id = user.id, "SMTP not configured, reset mail not sent");
        }
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password
///
/// Consume a reset token and set a new password. All sessions are revoked.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let token = PasswordResetRepo::consume(&state.pool, &hash_token(input.token.trim()))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".into()))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    ProfileRepo::update_password(&state.pool, token.user_id, &password_hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, token.user_id).await?;

    tracing::info!(user_id = token.user_id, "Password reset completed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = load_profile(&state, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(profile),
    }))
}

/// PUT /api/v1/auth/me
///
/// Update the caller's name, phone and avatar URL.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateOwnProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.full_name {
        require_non_empty("full_name", name)?;
        validate_max_length("full_name", name, MAX_NAME_LENGTH)?;
    }

    let profile = ProfileRepo::update_own(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");
    state.event_bus.publish(
        PlatformEvent::new(USER_UPDATED)
            .with_source("profile", profile.id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse {
        data: ProfileResponse::from(profile),
    }))
}

/// POST /api/v1/auth/me/password
///
/// Change the caller's password after re-checking the current one.
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let profile = load_profile(&state, auth.user_id).await?;

    let current_ok = verify_password(&input.current_password, &profile.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    ProfileRepo::update_password(&state.pool, auth.user_id, &password_hash).await?;

    tracing::info!(user_id = auth.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn load_profile(state: &AppState, user_id: sangam_core::types::DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user_id,
        }))
}

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, user: Profile) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: ProfileResponse::from(user),
    })
}
