//! Handlers for government exam listings.
//!
//! Public browsing lives under `/exams`, per-user saves and reminders need
//! an account, and maintenance lives under `/admin/exams`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sangam_core::exams::{
    infer_status, validate_level, validate_reminder_type, validate_status, validate_window,
};
use sangam_core::search::{page_window, total_pages};
use sangam_core::types::DbId;
use sangam_core::validation::{require_non_empty, validate_max_length, MAX_NAME_LENGTH};
use sangam_db::models::exam::{CreateExam, Exam, ExamFilter, UpdateExam};
use sangam_db::repositories::ExamRepo;
use serde::{Deserialize, Serialize};

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::non_blank;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ExamListParams {
    pub level: Option<String>,
    pub status: Option<String>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ExamListParams {
    fn into_filter(self, active_only: bool) -> ExamFilter {
        ExamFilter {
            level: non_blank(self.level),
            status: non_blank(self.status),
            state: non_blank(self.state),
            search: non_blank(self.search),
            active_only,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExamPage {
    pub exams: Vec<Exam>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SavedExamParams {
    pub level: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedExams {
    pub saved_exams: Vec<Exam>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct SaveToggle {
    pub saved: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub reminder_type: String,
}

#[derive(Debug, Serialize)]
pub struct ReminderToggle {
    pub reminder_type: String,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/exams
///
/// Active exams, closing deadlines first, page-numbered.
pub async fn list_exams(
    State(state): State<AppState>,
    Query(params): Query<ExamListParams>,
) -> AppResult<impl IntoResponse> {
    let window = page_window(params.page, params.page_size);
    let filter = params.into_filter(true);
    let page = load_page(&state, &filter, window.page, window.page_size, window.offset).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/exams/{id}
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let exam = ExamRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Exam", id))?;
    Ok(Json(DataResponse { data: exam }))
}

// ---------------------------------------------------------------------------
// Saved exams and reminders
// ---------------------------------------------------------------------------

/// POST /api/v1/exams/{id}/save
pub async fn toggle_saved(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_exists(&state, id).await?;
    let saved = ExamRepo::toggle_saved(&state.pool, user.user_id, id).await?;
    tracing::debug!(exam_id = id, user_id = user.user_id, saved, "Saved exam toggled");
    Ok(Json(DataResponse {
        data: SaveToggle { saved },
    }))
}

/// GET /api/v1/me/saved-exams
pub async fn list_saved(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SavedExamParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ExamFilter {
        level: non_blank(params.level),
        status: non_blank(params.status),
        state: None,
        search: non_blank(params.search),
        active_only: true,
    };
    let saved_exams = ExamRepo::list_saved(&state.pool, user.user_id, &filter).await?;
    let total = saved_exams.len() as i64;
    Ok(Json(DataResponse {
        data: SavedExams { saved_exams, total },
    }))
}

/// POST /api/v1/exams/{id}/reminders
pub async fn toggle_reminder(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReminderRequest>,
) -> AppResult<impl IntoResponse> {
    validate_reminder_type(&input.reminder_type)?;
    ensure_exists(&state, id).await?;

    let reminder =
        ExamRepo::toggle_reminder(&state.pool, user.user_id, id, &input.reminder_type).await?;
    Ok(Json(DataResponse {
        data: ReminderToggle {
            reminder_type: input.reminder_type,
            active: reminder.is_some(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/exams
///
/// Same filters as the public listing, inactive exams included.
pub async fn admin_list_exams(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ExamListParams>,
) -> AppResult<impl IntoResponse> {
    let window = page_window(params.page, params.page_size);
    let filter = params.into_filter(false);
    let page = load_page(&state, &filter, window.page, window.page_size, window.offset).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/admin/exams
///
/// Without an explicit status the exam gets the one its dates imply.
pub async fn create_exam(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateExam>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let status = match input.status.as_deref() {
        Some(status) => status,
        None => infer_status(
            input.application_start_date,
            input.application_last_date,
            Utc::now().date_naive(),
        ),
    };
    let exam = ExamRepo::create(&state.pool, &input, status).await?;

    tracing::info!(exam_id = exam.id, user_id = admin.user_id, "Exam created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: exam })))
}

/// PUT /api/v1/admin/exams/{id}
///
/// Date changes re-infer the status unless one is given explicitly.
pub async fn update_exam(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExam>,
) -> AppResult<impl IntoResponse> {
    let existing = ExamRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Exam", id))?;

    if let Some(name) = &input.exam_name {
        require_non_empty("exam_name", name)?;
        validate_max_length("exam_name", name, MAX_NAME_LENGTH)?;
    }
    if let Some(organization) = &input.organization {
        require_non_empty("organization", organization)?;
    }
    if let Some(level) = &input.level {
        validate_level(level)?;
    }
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    let start = input.application_start_date.or(existing.application_start_date);
    let last = input.application_last_date.or(existing.application_last_date);
    validate_window(start, last)?;

    let dates_changed =
        input.application_start_date.is_some() || input.application_last_date.is_some();
    let status = match input.status.as_deref() {
        Some(status) => Some(status),
        None if dates_changed => Some(infer_status(start, last, Utc::now().date_naive())),
        None => None,
    };

    let exam = ExamRepo::update(&state.pool, id, &input, status)
        .await?
        .ok_or_else(|| not_found("Exam", id))?;

    tracing::info!(exam_id = id, user_id = admin.user_id, "Exam updated");
    Ok(Json(DataResponse { data: exam }))
}

/// PUT /api/v1/admin/exams/{id}/status
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;
    let exam = ExamRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| not_found("Exam", id))?;
    tracing::info!(
        exam_id = id,
        status = %exam.status,
        user_id = admin.user_id,
        "Exam status set",
    );
    Ok(Json(DataResponse { data: exam }))
}

/// POST /api/v1/admin/exams/{id}/toggle-active
pub async fn toggle_active(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let exam = ExamRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Exam", id))?;
    tracing::info!(
        exam_id = id,
        is_active = exam.is_active,
        user_id = admin.user_id,
        "Exam active flag toggled",
    );
    Ok(Json(DataResponse { data: exam }))
}

/// DELETE /api/v1/admin/exams/{id}
pub async fn delete_exam(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ExamRepo::delete(&state.pool, id).await? {
        return Err(not_found("Exam", id));
    }
    tracing::info!(exam_id = id, user_id = admin.user_id, "Exam deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Field rules shared by admin creates.
fn validate_create(input: &CreateExam) -> AppResult<()> {
    require_non_empty("exam_name", &input.exam_name)?;
    validate_max_length("exam_name", &input.exam_name, MAX_NAME_LENGTH)?;
    require_non_empty("organization", &input.organization)?;
    if let Some(level) = &input.level {
        validate_level(level)?;
    }
    if let Some(status) = &input.status {
        validate_status(status)?;
    }
    validate_window(input.application_start_date, input.application_last_date)?;
    Ok(())
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ExamRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found("Exam", id))
}

async fn load_page(
    state: &AppState,
    filter: &ExamFilter,
    page: i64,
    page_size: i64,
    offset: i64,
) -> AppResult<ExamPage> {
    let exams = ExamRepo::list(&state.pool, filter, page_size, offset).await?;
    let total = ExamRepo::count(&state.pool, filter).await?;
    Ok(ExamPage {
        exams,
        total,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
    })
}
