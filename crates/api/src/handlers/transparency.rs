//! Handlers for the public finance ledger and its admin maintenance.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sangam_core::csv::build_csv;
use sangam_core::finance::{validate_type, CSV_HEADERS};
use sangam_core::types::{Date, DbId};
use sangam_core::validation::{require_non_empty, validate_positive_amount};
use sangam_db::models::transaction::{
    CreateTransaction, Transaction, TransactionFilter, UpdateTransaction,
};
use sangam_db::repositories::TransactionRepo;
use serde::Deserialize;

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::non_blank;
use crate::response::{csv_attachment, DataResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionListParams {
    pub transaction_type: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl TransactionListParams {
    fn into_filter(self) -> TransactionFilter {
        TransactionFilter {
            transaction_type: non_blank(self.transaction_type),
            from: self.from,
            to: self.to,
            verified_only: false,
        }
    }
}

/// GET /api/v1/transparency/summary
///
/// Income, expense and balance over verified entries.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let summary = TransactionRepo::summary(&state.pool, params.from, params.to).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/transparency/transactions
pub async fn public_transactions(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = TransactionFilter {
        transaction_type: None,
        from: params.from,
        to: params.to,
        verified_only: true,
    };
    let transactions = TransactionRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// GET /api/v1/admin/transactions
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<impl IntoResponse> {
    let transactions = TransactionRepo::list(&state.pool, &params.into_filter()).await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// POST /api/v1/admin/transactions
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTransaction>,
) -> AppResult<impl IntoResponse> {
    validate_type(&input.transaction_type)?;
    require_non_empty("category", &input.category)?;
    validate_positive_amount("amount", input.amount)?;

    let transaction = TransactionRepo::create(&state.pool, &input, admin.user_id).await?;
    tracing::info!(
        transaction_id = transaction.id,
        transaction_type = %transaction.transaction_type,
        amount = %transaction.amount,
        user_id = admin.user_id,
        "Transaction recorded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: transaction })))
}

/// PUT /api/v1/admin/transactions/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransaction>,
) -> AppResult<impl IntoResponse> {
    if let Some(kind) = &input.transaction_type {
        validate_type(kind)?;
    }
    if let Some(category) = &input.category {
        require_non_empty("category", category)?;
    }
    if let Some(amount) = input.amount {
        validate_positive_amount("amount", amount)?;
    }

    let transaction = TransactionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Transaction", id))?;
    tracing::info!(transaction_id = id, user_id = admin.user_id, "Transaction updated");
    Ok(Json(DataResponse { data: transaction }))
}

/// POST /api/v1/admin/transactions/{id}/verify
pub async fn verify(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transaction = TransactionRepo::verify(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| not_found("Transaction", id))?;
    tracing::info!(transaction_id = id, user_id = admin.user_id, "Transaction verified");
    Ok(Json(DataResponse { data: transaction }))
}

/// DELETE /api/v1/admin/transactions/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TransactionRepo::delete(&state.pool, id).await? {
        return Err(not_found("Transaction", id));
    }
    tracing::info!(transaction_id = id, user_id = admin.user_id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/transactions/export
pub async fn export(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<Response> {
    let transactions = TransactionRepo::list(&state.pool, &params.into_filter()).await?;
    let rows: Vec<Vec<String>> = transactions.iter().map(csv_row).collect();

    tracing::info!(rows = rows.len(), user_id = admin.user_id, "Transactions exported");
    Ok(csv_attachment("transactions.csv", build_csv(CSV_HEADERS, &rows)))
}

fn csv_row(t: &Transaction) -> Vec<String> {
    vec![
        t.transaction_date.format("%Y-%m-%d").to_string(),
        t.transaction_type.clone(),
        t.category.clone(),
        t.description.clone().unwrap_or_default(),
        format!("{:.2}", t.amount),
        if t.verified { "Yes" } else { "No" }.to_string(),
    ]
}
