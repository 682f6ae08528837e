//! Handlers for the library desk: patrons, issues, returns, fines and
//! reports. Every route requires the librarian or admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sangam_core::error::CoreError;
use sangam_core::event_types::{BOOK_ISSUED, BOOK_RETURNED};
use sangam_core::library::{
    compute_fine, days_overdue, default_due_date, validate_due_date, validate_issue_status,
};
use sangam_core::types::{DbId, Money, Timestamp};
use sangam_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_length, MAX_NAME_LENGTH,
};
use sangam_db::models::library::{
    BookIssueDetail, CreatePatron, IssueBook, IssueFilter, ReturnBook, UpdatePatron,
};
use sangam_db::repositories::{BookIssueRepo, PatronRepo};
use sangam_events::PlatformEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireLibrarian;
use crate::query::{non_blank, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PatronListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueListParams {
    pub status: Option<String>,
    pub patron_id: Option<DbId>,
    pub book_id: Option<DbId>,
    #[serde(default)]
    pub overdue_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /library/issues`.
#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub book_id: DbId,
    pub patron_id: DbId,
    pub due_date: Option<Timestamp>,
    pub notes: Option<String>,
}

/// An overdue issue with the fine it has accrued so far.
#[derive(Debug, Serialize)]
pub struct OverdueIssue {
    #[serde(flatten)]
    pub issue: BookIssueDetail,
    pub days_overdue: i64,
    pub accrued_fine: Money,
}

fn validate_patron_email(email: &mut Option<String>) -> Result<(), CoreError> {
    if let Some(value) = email.take().filter(|e| !e.trim().is_empty()) {
        let value = normalize_email(&value);
        validate_email(&value)?;
        *email = Some(value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Patrons
// ---------------------------------------------------------------------------

/// GET /api/v1/library/patrons
pub async fn list_patrons(
    RequireLibrarian(_librarian): RequireLibrarian,
    State(state): State<AppState>,
    Query(params): Query<PatronListParams>,
) -> AppResult<impl IntoResponse> {
    let search = non_blank(params.search);
    let patrons =
        PatronRepo::list(&state.pool, search.as_deref(), params.include_inactive).await?;
    Ok(Json(DataResponse { data: patrons }))
}

/// POST /api/v1/library/patrons
pub async fn create_patron(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Json(mut input): Json<CreatePatron>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("patron_code", &input.patron_code)?;
    require_non_empty("name", &input.name)?;
    validate_max_length("name", &input.name, MAX_NAME_LENGTH)?;
    validate_patron_email(&mut input.email)?;
    if input.max_books_allowed.is_some_and(|m| m < 1) {
        return Err(CoreError::Validation("max_books_allowed must be at least 1".into()).into());
    }

    let patron = PatronRepo::create(&state.pool, &input).await?;
    tracing::info!(
        patron_id = patron.id,
        patron_code = %patron.patron_code,
        user_id = librarian.user_id,
        "Patron registered",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: patron })))
}

/// GET /api/v1/library/patrons/{id}
pub async fn get_patron(
    RequireLibrarian(_librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let patron = PatronRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Patron", id))?;
    Ok(Json(DataResponse { data: patron }))
}

/// PUT /api/v1/library/patrons/{id}
pub async fn update_patron(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePatron>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_non_empty("name", name)?;
    }
    validate_patron_email(&mut input.email)?;
    if input.max_books_allowed.is_some_and(|m| m < 1) {
        return Err(CoreError::Validation("max_books_allowed must be at least 1".into()).into());
    }

    let patron = PatronRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Patron", id))?;
    tracing::info!(patron_id = id, user_id = librarian.user_id, "Patron updated");
    Ok(Json(DataResponse { data: patron }))
}

/// DELETE /api/v1/library/patrons/{id}
///
/// Soft delete: the patron is marked inactive and keeps its history.
pub async fn deactivate_patron(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !PatronRepo::deactivate(&state.pool, id).await? {
        return Err(not_found("Patron", id));
    }
    tracing::info!(patron_id = id, user_id = librarian.user_id, "Patron deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// GET /api/v1/library/issues
pub async fn list_issues(
    RequireLibrarian(_librarian): RequireLibrarian,
    State(state): State<AppState>,
    Query(params): Query<IssueListParams>,
) -> AppResult<impl IntoResponse> {
    let status = non_blank(params.status);
    if let Some(status) = &status {
        validate_issue_status(status)?;
    }
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = IssueFilter {
        status,
        patron_id: params.patron_id,
        book_id: params.book_id,
        overdue_only: params.overdue_only,
    };
    let issues = BookIssueRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: issues }))
}

/// POST /api/v1/library/issues
///
/// Lend one copy. Availability and the patron's limit are checked inside
/// the same transaction that decrements the copy count.
pub async fn issue_book(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Json(input): Json<IssueRequest>,
) -> AppResult<impl IntoResponse> {
    let issue_date = Utc::now();
    let due_date = match input.due_date {
        Some(due) => {
            validate_due_date(issue_date, due)?;
            due
        }
        None => default_due_date(issue_date),
    };

    let issue = BookIssueRepo::issue(
        &state.pool,
        &IssueBook {
            book_id: input.book_id,
            patron_id: input.patron_id,
            issued_by: librarian.user_id,
            issue_date,
            due_date,
            notes: non_blank(input.notes),
        },
    )
    .await?;

    tracing::info!(
        issue_id = issue.id,
        book_id = issue.book_id,
        patron_id = issue.patron_id,
        user_id = librarian.user_id,
        "Book issued",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOK_ISSUED)
            .with_source("book_issue", issue.id)
            .with_actor(librarian.user_id)
            .with_payload(json!({
                "book_id": issue.book_id,
                "patron_id": issue.patron_id,
                "due_date": issue.due_date,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: issue })))
}

/// POST /api/v1/library/issues/{id}/return
///
/// Close an issue, charge any overdue fine and put the copy back on the shelf.
pub async fn return_book(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let issue = BookIssueRepo::return_book(
        &state.pool,
        id,
        &ReturnBook {
            returned_by: librarian.user_id,
            return_date: Utc::now(),
        },
    )
    .await?;

    tracing::info!(
        issue_id = id,
        book_id = issue.book_id,
        fine = %issue.fine_amount,
        user_id = librarian.user_id,
        "Book returned",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOK_RETURNED)
            .with_source("book_issue", id)
            .with_actor(librarian.user_id)
            .with_payload(json!({
                "book_id": issue.book_id,
                "patron_id": issue.patron_id,
                "fine_amount": issue.fine_amount,
            })),
    );

    Ok(Json(DataResponse { data: issue }))
}

/// POST /api/v1/library/issues/{id}/pay-fine
pub async fn pay_fine(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let issue = BookIssueRepo::pay_fine(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("BookIssue", id))?;
    tracing::info!(
        issue_id = id,
        fine = %issue.fine_amount,
        user_id = librarian.user_id,
        "Fine paid",
    );
    Ok(Json(DataResponse { data: issue }))
}

/// GET /api/v1/library/overdue
///
/// Unreturned issues past due, oldest due date first.
pub async fn list_overdue(
    RequireLibrarian(_librarian): RequireLibrarian,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now();
    let overdue: Vec<OverdueIssue> = BookIssueRepo::list_overdue(&state.pool)
        .await?
        .into_iter()
        .map(|issue| OverdueIssue {
            days_overdue: days_overdue(issue.due_date, now),
            accrued_fine: compute_fine(issue.due_date, now),
            issue,
        })
        .collect();
    Ok(Json(DataResponse { data: overdue }))
}

/// GET /api/v1/library/dashboard
pub async fn dashboard(
    RequireLibrarian(_librarian): RequireLibrarian,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let dashboard = BookIssueRepo::dashboard(&state.pool).await?;
    Ok(Json(DataResponse { data: dashboard }))
}
