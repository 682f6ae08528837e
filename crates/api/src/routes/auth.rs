//! Route definitions for accounts and sessions, mounted at `/auth`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /signup            -> signup
/// POST /login             -> login
/// POST /refresh           -> refresh
/// POST /logout            -> logout
/// POST /forgot-password   -> forgot_password
/// POST /reset-password    -> reset_password
/// GET  /me                -> me
/// PUT  /me                -> update_me
/// POST /me/password       -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/me", get(auth::me).put(auth::update_me))
        .route("/me/password", post(auth::change_password))
}
