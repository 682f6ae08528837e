//! HTTP-level integration tests for the community hub.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_data, get_auth, post_auth, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

/// Join as an (auto-approved) student and return the student id.
async fn join_student(app: axum::Router, token: &str, name: &str, email: &str) -> i64 {
    let body = json!({ "name": name, "email": email, "college": "Patna University" });
    let data = expect_data(
        post_json_auth(app, "/api/v1/community/students", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

async fn create_post(app: axum::Router, token: &str) -> i64 {
    let body = json!({
        "title": "How to prepare for reasoning?",
        "content": "Any book suggestions for the reasoning section?",
        "category": "doubt",
    });
    let data = expect_data(
        post_json_auth(app, "/api/v1/community/posts", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_joins_once(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "ravi@example.org", "user").await;
    let app = common::build_test_app(pool);

    let id = join_student(app.clone(), &token, "Ravi", "ravi@example.org").await;

    let me = expect_data(
        get_auth(app.clone(), "/api/v1/community/me", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(me["author_type"], "student");
    assert_eq!(me["id"], id);

    let body = json!({ "name": "Ravi", "email": "ravi@example.org" });
    let response = post_json_auth(app, "/api/v1/community/students", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_member_cannot_post_until_approved(pool: PgPool) {
    let (_admin, admin_token) =
        common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_user, token) = common::user_with_token(&pool, "mentor@example.org", "user").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Mentor",
        "email": "mentor@example.org",
        "profession": "Engineer",
        "skills": ["maths", "physics"],
    });
    let member = expect_data(
        post_json_auth(app.clone(), "/api/v1/community/members", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(member["status"], "pending");

    let response = get_auth(app.clone(), "/api/v1/community/me", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let post = json!({ "title": "Hello", "content": "First post" });
    let response =
        post_json_auth(app.clone(), "/api/v1/community/posts", post.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/admin/community/members/{}/approve", member["id"]);
    let approved =
        expect_data(post_auth(app.clone(), &uri, &admin_token).await, StatusCode::OK).await;
    assert_eq!(approved["status"], "approved");

    let response = post_json_auth(app, "/api/v1/community/posts", post, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Forum
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_post_author_marks_best_answer(pool: PgPool) {
    let (_asker, asker_token) =
        common::user_with_token(&pool, "asker@example.org", "user").await;
    let (_helper, helper_token) =
        common::user_with_token(&pool, "helper@example.org", "user").await;
    let app = common::build_test_app(pool);

    join_student(app.clone(), &asker_token, "Asker", "asker@example.org").await;
    join_student(app.clone(), &helper_token, "Helper", "helper@example.org").await;
    let post_id = create_post(app.clone(), &asker_token).await;

    let reply = expect_data(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/community/posts/{post_id}/replies"),
            json!({ "content": "Try R. S. Aggarwal." }),
            &helper_token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let best_uri = format!("/api/v1/community/replies/{}/best-answer", reply["id"]);

    let response = post_auth(app.clone(), &best_uri, &helper_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let marked = expect_data(
        post_auth(app.clone(), &best_uri, &asker_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(marked["is_best_answer"], true);

    let thread = expect_data(
        get_auth(app, &format!("/api/v1/community/posts/{post_id}"), &asker_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(thread["is_answered"], true);
    assert_eq!(thread["replies"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upvotes_count_once_per_participant(pool: PgPool) {
    let (_author, author_token) =
        common::user_with_token(&pool, "author@example.org", "user").await;
    let (_fan, fan_token) = common::user_with_token(&pool, "fan@example.org", "user").await;
    let app = common::build_test_app(pool);

    join_student(app.clone(), &author_token, "Author", "author@example.org").await;
    join_student(app.clone(), &fan_token, "Fan", "fan@example.org").await;
    let post_id = create_post(app.clone(), &author_token).await;
    let uri = format!("/api/v1/community/posts/{post_id}/upvote");

    let first = expect_data(post_auth(app.clone(), &uri, &fan_token).await, StatusCode::OK).await;
    assert_eq!(first["upvotes"], 1);
    let again = expect_data(post_auth(app, &uri, &fan_token).await, StatusCode::OK).await;
    assert_eq!(again["upvotes"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_deletion_is_limited_to_author_and_admin(pool: PgPool) {
    let (_admin, admin_token) =
        common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_author, author_token) =
        common::user_with_token(&pool, "author@example.org", "user").await;
    let (_other, other_token) = common::user_with_token(&pool, "other@example.org", "user").await;
    let app = common::build_test_app(pool);

    join_student(app.clone(), &author_token, "Author", "author@example.org").await;
    join_student(app.clone(), &other_token, "Other", "other@example.org").await;
    let post_id = create_post(app.clone(), &author_token).await;
    let uri = format!("/api/v1/community/posts/{post_id}");

    let response = delete_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &author_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Direct messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn direct_messages_track_unread(pool: PgPool) {
    let (_a, a_token) = common::user_with_token(&pool, "a@example.org", "user").await;
    let (_b, b_token) = common::user_with_token(&pool, "b@example.org", "user").await;
    let app = common::build_test_app(pool);

    let a_id = join_student(app.clone(), &a_token, "Asha", "a@example.org").await;
    let b_id = join_student(app.clone(), &b_token, "Bina", "b@example.org").await;

    let body = json!({ "receiver_type": "student", "receiver_id": b_id, "content": "Namaste!" });
    let response = post_json_auth(app.clone(), "/api/v1/community/dm", body, &a_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let unread = expect_data(
        get_auth(app.clone(), "/api/v1/community/dm/unread", &b_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(unread[0]["sender_id"], a_id);
    assert_eq!(unread[0]["count"], 1);

    // Opening the conversation marks it read.
    let conversation = expect_data(
        get_auth(
            app.clone(),
            &format!("/api/v1/community/dm/student/{a_id}"),
            &b_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(conversation.as_array().unwrap().len(), 1);

    let unread = expect_data(
        get_auth(app, "/api/v1/community/dm/unread", &b_token).await,
        StatusCode::OK,
    )
    .await;
    assert!(unread.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cannot_message_yourself(pool: PgPool) {
    let (_a, token) = common::user_with_token(&pool, "solo@example.org", "user").await;
    let app = common::build_test_app(pool);

    let id = join_student(app.clone(), &token, "Solo", "solo@example.org").await;
    let body = json!({ "receiver_type": "student", "receiver_id": id, "content": "hi me" });
    let response = post_json_auth(app, "/api/v1/community/dm", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
