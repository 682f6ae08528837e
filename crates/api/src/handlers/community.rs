//! Handlers for the community hub: membership, forum, group chat and
//! direct messages, plus admin moderation under `/admin/community`.
//!
//! Every forum and chat action is taken as the caller's resolved
//! [`Participant`]; an account that has not joined (or is not yet approved)
//! gets 403.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::community::{
    validate_author_type, validate_category, validate_membership_status, validate_message,
    validate_post, validate_reply, Participant, AUTHOR_MEMBER, AUTHOR_STUDENT, CATEGORY_GENERAL,
    CHAT_HISTORY_LIMIT, MEMBERSHIP_APPROVED, MEMBERSHIP_PENDING, MEMBERSHIP_REJECTED,
};
use sangam_core::error::CoreError;
use sangam_core::event_types::{
    COMMUNITY_DM_SENT, COMMUNITY_MEMBER_REVIEWED, COMMUNITY_MESSAGE_SENT, COMMUNITY_POST_CREATED,
    COMMUNITY_REPLY_CREATED,
};
use sangam_core::roles::ROLE_ADMIN;
use sangam_core::types::DbId;
use sangam_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_length, MAX_NAME_LENGTH,
};
use sangam_db::models::community::{
    CommunityMember, CreateChatMessage, CreateCommunityMember, CreatePost, CreateReply,
    CreateStudent, PostFilter, PostWithReplies, SendDirectMessage,
};
use sangam_db::repositories::{ChatRepo, CommunityMemberRepo, ForumRepo, ParticipantRepo, StudentRepo};
use sangam_events::PlatformEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{not_found, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::notifications::router::RECIPIENT_KEY;
use crate::query::{non_blank, PaginationParams, StatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UpvoteCount {
    pub upvotes: i32,
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// POST /api/v1/community/students
///
/// Students are approved on joining.
pub async fn join_as_student(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateStudent>,
) -> AppResult<impl IntoResponse> {
    validate_applicant(&input.name, &mut input.email)?;
    if ParticipantRepo::has_joined(&state.pool, user.user_id, AUTHOR_STUDENT).await? {
        return Err(CoreError::Conflict("You have already joined as a student".into()).into());
    }

    let student =
        StudentRepo::create(&state.pool, &input, user.user_id, MEMBERSHIP_APPROVED).await?;
    tracing::info!(student_id = student.id, user_id = user.user_id, "Student joined community");
    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// POST /api/v1/community/members
///
/// Members wait for admin approval.
pub async fn apply_as_member(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateCommunityMember>,
) -> AppResult<impl IntoResponse> {
    validate_applicant(&input.name, &mut input.email)?;
    if ParticipantRepo::has_joined(&state.pool, user.user_id, AUTHOR_MEMBER).await? {
        return Err(
            CoreError::Conflict("You have already applied as a community member".into()).into(),
        );
    }

    let member =
        CommunityMemberRepo::create(&state.pool, &input, user.user_id, MEMBERSHIP_PENDING).await?;
    tracing::info!(member_id = member.id, user_id = user.user_id, "Community member applied");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/community/me
pub async fn me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let participant = ParticipantRepo::resolve(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| not_found("Participant", user.user_id))?;
    Ok(Json(DataResponse {
        data: json!({
            "author_type": participant.author_type,
            "id": participant.id,
            "name": participant.name,
        }),
    }))
}

/// GET /api/v1/community/directory
pub async fn directory(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let entries = ParticipantRepo::directory(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Forum
// ---------------------------------------------------------------------------

/// GET /api/v1/community/posts
pub async fn list_posts(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = PostFilter {
        category: non_blank(params.category),
        search: non_blank(params.search),
    };
    let posts = ForumRepo::list_posts(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/community/posts
pub async fn create_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    let author = participant(&state, &user).await?;
    validate_post(&input.title, &input.content)?;
    let category = non_blank(input.category.clone()).unwrap_or_else(|| CATEGORY_GENERAL.into());
    validate_category(&category)?;

    let post = ForumRepo::create_post(&state.pool, &author, &input, &category).await?;

    tracing::info!(post_id = post.id, user_id = user.user_id, "Community post created");
    state.event_bus.publish(
        PlatformEvent::new(COMMUNITY_POST_CREATED)
            .with_source("community_post", post.id)
            .with_actor(user.user_id)
            .with_payload(json!(post)),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/v1/community/posts/{id}
///
/// The post with its replies, best answer first.
pub async fn get_post(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = ForumRepo::find_post(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Post", id))?;
    let replies = ForumRepo::list_replies(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: PostWithReplies { post, replies },
    }))
}

/// DELETE /api/v1/community/posts/{id}
///
/// Allowed for the post's author and for admins.
pub async fn delete_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let post = ForumRepo::find_post(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Post", id))?;

    if user.role != ROLE_ADMIN {
        let me = participant(&state, &user).await?;
        if !me.is(&post.author_type, post.author_id) {
            return Err(CoreError::Forbidden("Only the author can delete this post".into()).into());
        }
    }

    ForumRepo::delete_post(&state.pool, id).await?;
    tracing::info!(post_id = id, user_id = user.user_id, "Community post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/community/posts/{id}/replies
pub async fn create_reply(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateReply>,
) -> AppResult<impl IntoResponse> {
    let author = participant(&state, &user).await?;
    validate_reply(&input.content)?;
    ForumRepo::find_post(&state.pool, post_id)
        .await?
        .ok_or_else(|| not_found("Post", post_id))?;

    let reply = ForumRepo::create_reply(&state.pool, post_id, &author, &input.content).await?;

    tracing::info!(
        reply_id = reply.id,
        post_id,
        user_id = user.user_id,
        "Community reply created",
    );
    state.event_bus.publish(
        PlatformEvent::new(COMMUNITY_REPLY_CREATED)
            .with_source("community_reply", reply.id)
            .with_actor(user.user_id)
            .with_payload(json!(reply)),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: reply })))
}

/// POST /api/v1/community/posts/{id}/upvote
///
/// One upvote per participant; repeats leave the count unchanged.
pub async fn upvote_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let voter = participant(&state, &user).await?;
    let upvotes = ForumRepo::upvote_post(&state.pool, id, &voter)
        .await?
        .ok_or_else(|| not_found("Post", id))?;
    Ok(Json(DataResponse {
        data: UpvoteCount { upvotes },
    }))
}

/// POST /api/v1/community/replies/{id}/upvote
pub async fn upvote_reply(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let voter = participant(&state, &user).await?;
    let upvotes = ForumRepo::upvote_reply(&state.pool, id, &voter)
        .await?
        .ok_or_else(|| not_found("Reply", id))?;
    Ok(Json(DataResponse {
        data: UpvoteCount { upvotes },
    }))
}

/// POST /api/v1/community/replies/{id}/best-answer
///
/// Only the author of the post may pick its best answer.
pub async fn mark_best_answer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let me = participant(&state, &user).await?;
    let reply = ForumRepo::find_reply(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Reply", id))?;
    let post = ForumRepo::find_post(&state.pool, reply.post_id)
        .await?
        .ok_or_else(|| not_found("Post", reply.post_id))?;

    if !me.is(&post.author_type, post.author_id) {
        return Err(CoreError::Forbidden(
            "Only the author of the post can choose the best answer".into(),
        )
        .into());
    }

    let reply = ForumRepo::mark_best_answer(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Reply", id))?;
    tracing::info!(reply_id = id, post_id = post.id, user_id = user.user_id, "Best answer chosen");
    Ok(Json(DataResponse { data: reply }))
}

// ---------------------------------------------------------------------------
// Group chat
// ---------------------------------------------------------------------------

/// GET /api/v1/community/messages
///
/// The most recent messages, oldest first.
pub async fn list_messages(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    participant(&state, &user).await?;
    let messages = ChatRepo::recent_messages(&state.pool, CHAT_HISTORY_LIMIT).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/community/messages
pub async fn post_message(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateChatMessage>,
) -> AppResult<impl IntoResponse> {
    let sender = participant(&state, &user).await?;
    validate_message(&input.content)?;

    let message = ChatRepo::post_message(&state.pool, &sender, &input.content).await?;

    tracing::debug!(message_id = message.id, user_id = user.user_id, "Chat message sent");
    state.event_bus.publish(
        PlatformEvent::new(COMMUNITY_MESSAGE_SENT)
            .with_source("community_message", message.id)
            .with_actor(user.user_id)
            .with_payload(json!(message)),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

// ---------------------------------------------------------------------------
// Direct messages
// ---------------------------------------------------------------------------

/// POST /api/v1/community/dm
pub async fn send_dm(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<SendDirectMessage>,
) -> AppResult<impl IntoResponse> {
    let sender = participant(&state, &user).await?;
    validate_author_type(&input.receiver_type)?;
    validate_message(&input.content)?;
    if sender.is(&input.receiver_type, input.receiver_id) {
        return Err(AppError::BadRequest("Cannot send a message to yourself".into()));
    }

    let receiver = ParticipantRepo::find(&state.pool, &input.receiver_type, input.receiver_id)
        .await?
        .ok_or_else(|| not_found("Participant", input.receiver_id))?;

    let message = ChatRepo::send_dm(&state.pool, &sender, &receiver, &input.content).await?;

    tracing::debug!(
        message_id = message.id,
        receiver_type = %receiver.author_type,
        receiver_id = receiver.id,
        user_id = user.user_id,
        "Direct message sent",
    );

    let mut payload = json!({ "message": message });
    if let Some(receiver_user) = receiver.user_id {
        payload[RECIPIENT_KEY] = json!(receiver_user);
    }
    state.event_bus.publish(
        PlatformEvent::new(COMMUNITY_DM_SENT)
            .with_source("community_dm", message.id)
            .with_actor(user.user_id)
            .with_payload(payload),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/community/dm/{peer_type}/{peer_id}
///
/// Both directions, oldest first. Messages received from the peer are
/// marked read.
pub async fn conversation(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((peer_type, peer_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let me = participant(&state, &user).await?;
    validate_author_type(&peer_type)?;
    let messages = ChatRepo::conversation(&state.pool, &me, &peer_type, peer_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// GET /api/v1/community/dm/unread
pub async fn unread_counts(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let me = participant(&state, &user).await?;
    let counts = ChatRepo::unread_counts(&state.pool, &me).await?;
    Ok(Json(DataResponse { data: counts }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/community/students
pub async fn admin_list_students(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let status = non_blank(params.status);
    let students = StudentRepo::list(&state.pool, status.as_deref()).await?;
    Ok(Json(DataResponse { data: students }))
}

/// GET /api/v1/admin/community/members
pub async fn admin_list_members(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> AppResult<impl IntoResponse> {
    let status = non_blank(params.status);
    if let Some(status) = &status {
        validate_membership_status(status)?;
    }
    let members = CommunityMemberRepo::list(&state.pool, status.as_deref()).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/admin/community/members/{id}/approve
pub async fn approve_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    review_member(&state, &admin, id, MEMBERSHIP_APPROVED).await
}

/// POST /api/v1/admin/community/members/{id}/reject
pub async fn reject_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    review_member(&state, &admin, id, MEMBERSHIP_REJECTED).await
}

/// DELETE /api/v1/admin/community/students/{id}
pub async fn delete_student(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !StudentRepo::delete(&state.pool, id).await? {
        return Err(not_found("Student", id));
    }
    tracing::info!(student_id = id, user_id = admin.user_id, "Student removed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/community/members/{id}
pub async fn delete_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CommunityMemberRepo::delete(&state.pool, id).await? {
        return Err(not_found("CommunityMember", id));
    }
    tracing::info!(member_id = id, user_id = admin.user_id, "Community member removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The caller's community identity, or 403 when they have none.
async fn participant(state: &AppState, user: &AuthUser) -> AppResult<Participant> {
    ParticipantRepo::resolve(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::Forbidden("Join the community to take part".into()).into())
}

fn validate_applicant(name: &str, email: &mut String) -> AppResult<()> {
    require_non_empty("name", name)?;
    validate_max_length("name", name, MAX_NAME_LENGTH)?;
    *email = normalize_email(email);
    validate_email(email)?;
    Ok(())
}

async fn review_member(
    state: &AppState,
    admin: &AuthUser,
    id: DbId,
    status: &str,
) -> AppResult<Json<DataResponse<CommunityMember>>> {
    let member = CommunityMemberRepo::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| not_found("CommunityMember", id))?;

    tracing::info!(member_id = id, status, user_id = admin.user_id, "Community member reviewed");

    let mut payload = json!({ "status": member.status });
    if let Some(applicant) = member.user_id {
        payload[RECIPIENT_KEY] = json!(applicant);
    }
    state.event_bus.publish(
        PlatformEvent::new(COMMUNITY_MEMBER_REVIEWED)
            .with_source("community_member", id)
            .with_actor(admin.user_id)
            .with_payload(payload),
    );

    Ok(Json(DataResponse { data: member }))
}
