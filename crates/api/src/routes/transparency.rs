//! Route definitions for the public ledger.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::transparency;
use crate::state::AppState;

/// Public ledger mounted at `/transparency`.
///
/// ```text
/// GET /summary        -> summary
/// GET /transactions   -> public_transactions
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(transparency::summary))
        .route("/transactions", get(transparency::public_transactions))
}

/// Ledger maintenance mounted at `/admin/transactions`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /export        -> export
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/verify   -> verify
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(transparency::list).post(transparency::create))
        .route("/export", get(transparency::export))
        .route(
            "/{id}",
            put(transparency::update).delete(transparency::delete),
        )
        .route("/{id}/verify", post(transparency::verify))
}
