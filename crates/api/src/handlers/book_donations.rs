//! Handlers for book donation pledges: the public form and the admin
//! review queue with its CSV export.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sangam_core::book_donations::{
    stamps_receipt, validate_quantity, validate_status, CSV_HEADERS,
};
use sangam_core::books::{validate_category, validate_condition};
use sangam_core::csv::build_csv;
use sangam_core::error::CoreError;
use sangam_core::event_types::{BOOK_DONATION_STATUS_CHANGED, BOOK_DONATION_SUBMITTED};
use sangam_core::types::DbId;
use sangam_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_length, MAX_NAME_LENGTH,
};
use sangam_db::models::book_donation::{BookDonation, BookDonationFilter, CreateBookDonation};
use sangam_db::repositories::BookDonationRepo;
use sangam_events::PlatformEvent;
use serde::Deserialize;
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{non_blank, StatusSearchParams};
use crate::response::{csv_attachment, DataResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesUpdate {
    pub notes: Option<String>,
}

fn validate_pledge(input: &mut CreateBookDonation) -> Result<(), CoreError> {
    require_non_empty("donor_name", &input.donor_name)?;
    validate_max_length("donor_name", &input.donor_name, MAX_NAME_LENGTH)?;
    require_non_empty("book_title", &input.book_title)?;
    validate_max_length("book_title", &input.book_title, MAX_NAME_LENGTH)?;
    if let Some(email) = input.donor_email.take().filter(|e| !e.trim().is_empty()) {
        let email = normalize_email(&email);
        validate_email(&email)?;
        input.donor_email = Some(email);
    }
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    if let Some(condition) = &input.condition {
        validate_condition(condition)?;
    }
    validate_quantity(input.quantity.unwrap_or(1))
}

async fn record_pledge(
    state: &AppState,
    mut input: CreateBookDonation,
    actor: Option<DbId>,
) -> AppResult<BookDonation> {
    validate_pledge(&mut input)?;
    let donation = BookDonationRepo::create(&state.pool, &input).await?;

    tracing::info!(
        book_donation_id = donation.id,
        quantity = donation.quantity,
        "Book donation recorded",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOK_DONATION_SUBMITTED)
            .with_source("book_donation", donation.id)
            .with_optional_actor(actor)
            .with_payload(json!({
                "book_title": donation.book_title,
                "quantity": donation.quantity,
            })),
    );
    Ok(donation)
}

/// POST /api/v1/book-donations
///
/// Public pledge form. Status starts at `pending`.
pub async fn submit(
    caller: OptionalAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBookDonation>,
) -> AppResult<impl IntoResponse> {
    let donation = record_pledge(&state, input, caller.user_id()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

/// GET /api/v1/admin/book-donations
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusSearchParams>,
) -> AppResult<impl IntoResponse> {
    let filter = BookDonationFilter {
        status: non_blank(params.status),
        search: non_blank(params.search),
    };
    let donations = BookDonationRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: donations }))
}

/// POST /api/v1/admin/book-donations
///
/// Manual entry for pledges taken in person.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBookDonation>,
) -> AppResult<impl IntoResponse> {
    let donation = record_pledge(&state, input, Some(admin.user_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

/// PUT /api/v1/admin/book-donations/{id}/status
///
/// Moving to `received` stamps who received it and when.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    let donation = BookDonationRepo::update_status(
        &state.pool,
        id,
        &input.status,
        stamps_receipt(&input.status),
        admin.user_id,
    )
    .await?
    .ok_or_else(|| not_found("BookDonation", id))?;

    tracing::info!(
        book_donation_id = id,
        status = %donation.status,
        user_id = admin.user_id,
        "Book donation status updated",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOK_DONATION_STATUS_CHANGED)
            .with_source("book_donation", id)
            .with_actor(admin.user_id)
            .with_payload(json!({ "status": donation.status })),
    );

    Ok(Json(DataResponse { data: donation }))
}

/// PUT /api/v1/admin/book-donations/{id}/notes
pub async fn update_notes(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NotesUpdate>,
) -> AppResult<impl IntoResponse> {
    let notes = non_blank(input.notes);
    let donation = BookDonationRepo::update_notes(&state.pool, id, notes.as_deref())
        .await?
        .ok_or_else(|| not_found("BookDonation", id))?;
    tracing::info!(book_donation_id = id, user_id = admin.user_id, "Book donation notes updated");
    Ok(Json(DataResponse { data: donation }))
}

/// DELETE /api/v1/admin/book-donations/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BookDonationRepo::delete(&state.pool, id).await? {
        return Err(not_found("BookDonation", id));
    }
    tracing::info!(book_donation_id = id, user_id = admin.user_id, "Book donation deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/book-donations/stats
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = BookDonationRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/book-donations/export
///
/// CSV of the filtered list, one row per pledge.
pub async fn export(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusSearchParams>,
) -> AppResult<Response> {
    let filter = BookDonationFilter {
        status: non_blank(params.status),
        search: non_blank(params.search),
    };
    let donations = BookDonationRepo::list(&state.pool, &filter).await?;
    let rows: Vec<Vec<String>> = donations.iter().map(csv_row).collect();

    tracing::info!(rows = rows.len(), user_id = admin.user_id, "Book donations exported");
    Ok(csv_attachment("book-donations.csv", build_csv(CSV_HEADERS, &rows)))
}

fn csv_row(d: &BookDonation) -> Vec<String> {
    vec![
        d.donor_name.clone(),
        d.donor_email.clone().unwrap_or_default(),
        d.donor_phone.clone().unwrap_or_default(),
        d.book_title.clone(),
        d.author.clone().unwrap_or_default(),
        d.category.clone().unwrap_or_default(),
        d.condition.clone(),
        d.quantity.to_string(),
        d.status.clone(),
        d.created_at.format("%Y-%m-%d").to_string(),
    ]
}
