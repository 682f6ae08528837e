//! Route definitions for the community hub.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::community;
use crate::state::AppState;

/// Participant routes mounted at `/community`.
///
/// ```text
/// POST   /students                   -> join_as_student
/// POST   /members                    -> apply_as_member
/// GET    /me                         -> me
/// GET    /directory                  -> directory
/// GET    /posts                      -> list_posts
/// POST   /posts                      -> create_post
/// GET    /posts/{id}                 -> get_post
/// DELETE /posts/{id}                 -> delete_post
/// POST   /posts/{id}/replies         -> create_reply
/// POST   /posts/{id}/upvote          -> upvote_post
/// POST   /replies/{id}/upvote        -> upvote_reply
/// POST   /replies/{id}/best-answer   -> mark_best_answer
/// GET    /messages                   -> list_messages
/// POST   /messages                   -> post_message
/// POST   /dm                         -> send_dm
/// GET    /dm/unread                  -> unread_counts
/// GET    /dm/{peer_type}/{peer_id}   -> conversation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", post(community::join_as_student))
        .route("/members", post(community::apply_as_member))
        .route("/me", get(community::me))
        .route("/directory", get(community::directory))
        .route(
            "/posts",
            get(community::list_posts).post(community::create_post),
        )
        .route(
            "/posts/{id}",
            get(community::get_post).delete(community::delete_post),
        )
        .route("/posts/{id}/replies", post(community::create_reply))
        .route("/posts/{id}/upvote", post(community::upvote_post))
        .route("/replies/{id}/upvote", post(community::upvote_reply))
        .route("/replies/{id}/best-answer", post(community::mark_best_answer))
        .route(
            "/messages",
            get(community::list_messages).post(community::post_message),
        )
        .route("/dm", post(community::send_dm))
        .route("/dm/unread", get(community::unread_counts))
        .route("/dm/{peer_type}/{peer_id}", get(community::conversation))
}

/// Moderation mounted at `/admin/community`.
///
/// ```text
/// GET    /students               -> admin_list_students
/// DELETE /students/{id}          -> delete_student
/// GET    /members                -> admin_list_members
/// DELETE /members/{id}           -> delete_member
/// POST   /members/{id}/approve   -> approve_member
/// POST   /members/{id}/reject    -> reject_member
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/students", get(community::admin_list_students))
        .route("/students/{id}", delete(community::delete_student))
        .route("/members", get(community::admin_list_members))
        .route("/members/{id}", delete(community::delete_member))
        .route("/members/{id}/approve", post(community::approve_member))
        .route("/members/{id}/reject", post(community::reject_member))
}
