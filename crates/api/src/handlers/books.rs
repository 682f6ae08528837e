//! Handlers for the book catalogue: public browsing under `/books` and
//! librarian maintenance under `/library/books`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::books::{
    status_for_copies, validate_category, validate_condition, validate_copies, validate_status,
};
use sangam_core::error::CoreError;
use sangam_core::event_types::{BOOK_CREATED, BOOK_DELETED, BOOK_UPDATED};
use sangam_core::types::DbId;
use sangam_core::validation::{require_non_empty, validate_max_length, MAX_NAME_LENGTH};
use sangam_db::models::book::{BookFilter, CreateBook, UpdateBook};
use sangam_db::repositories::BookRepo;
use sangam_events::PlatformEvent;
use serde::Deserialize;
use serde_json::json;

use crate::error::{not_found, AppError, AppResult};
use crate::middleware::rbac::RequireLibrarian;
use crate::query::{non_blank, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BookListParams {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/books
///
/// Browse the catalogue with optional category, status and title/author search.
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BookListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = BookFilter {
        category: non_blank(params.category),
        status: non_blank(params.status),
        search: non_blank(params.search),
    };
    let books = BookRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: books }))
}

/// GET /api/v1/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Book", id))?;
    Ok(Json(DataResponse { data: book }))
}

/// GET /api/v1/books/stats
pub async fn book_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = BookRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/library/books
///
/// Add a book. Copies default to one, all available.
pub async fn create_book(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Json(input): Json<CreateBook>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("accession_number", &input.accession_number)?;
    require_non_empty("title", &input.title)?;
    validate_max_length("title", &input.title, MAX_NAME_LENGTH)?;
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    if let Some(status) = &input.status {
        validate_status(status)?;
    }
    if let Some(condition) = &input.condition {
        validate_condition(condition)?;
    }
    let total = input.total_copies.unwrap_or(1);
    validate_copies(total, input.available_copies.unwrap_or(total))?;

    let book = BookRepo::create(&state.pool, &input, librarian.user_id).await?;

    tracing::info!(
        book_id = book.id,
        accession_number = %book.accession_number,
        user_id = librarian.user_id,
        "Book created",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOK_CREATED)
            .with_source("book", book.id)
            .with_actor(librarian.user_id)
            .with_payload(json!({ "title": book.title })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// PUT /api/v1/library/books/{id}
///
/// Partial update. Copy counts are re-validated against the merged row and
/// a lending status follows the available count unless set explicitly.
pub async fn update_book(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBook>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_empty("title", title)?;
    }
    if let Some(accession) = &input.accession_number {
        require_non_empty("accession_number", accession)?;
    }
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    if let Some(condition) = &input.condition {
        validate_condition(condition)?;
    }

    let existing = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Book", id))?;

    let total = input.total_copies.unwrap_or(existing.total_copies);
    let available = input.available_copies.unwrap_or(existing.available_copies);
    validate_copies(total, available)?;

    let status = match &input.status {
        Some(status) => {
            validate_status(status)?;
            status.clone()
        }
        None => status_for_copies(&existing.status, available).to_string(),
    };

    let book = BookRepo::update(&state.pool, id, &input, Some(&status))
        .await?
        .ok_or_else(|| not_found("Book", id))?;

    tracing::info!(book_id = id, user_id = librarian.user_id, "Book updated");
    state.event_bus.publish(
        PlatformEvent::new(BOOK_UPDATED)
            .with_source("book", id)
            .with_actor(librarian.user_id),
    );

    Ok(Json(DataResponse { data: book }))
}

/// DELETE /api/v1/library/books/{id}
///
/// Refused with 409 while a copy is on loan.
pub async fn delete_book(
    RequireLibrarian(librarian): RequireLibrarian,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BookRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Book", id }));
    }

    tracing::info!(book_id = id, user_id = librarian.user_id, "Book deleted");
    state.event_bus.publish(
        PlatformEvent::new(BOOK_DELETED)
            .with_source("book", id)
            .with_actor(librarian.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
