//! HTTP-level integration tests for volunteer applications.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_data, get_auth, post_json, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

fn application(name: &str, email: &str) -> serde_json::Value {
    json!({
        "name": name,
        "email": email,
        "phone": "9845000000",
        "city": "Mysuru",
        "skills": ["teaching", "cataloguing"],
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn applications_start_pending(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "helper@example.org", "user").await;
    let app = common::build_test_app(pool);

    let guest = expect_data(
        post_json(
            app.clone(),
            "/api/v1/volunteer-applications",
            application("Guest", "Guest@Example.org"),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(guest["status"], "pending");
    assert_eq!(guest["email"], "guest@example.org");
    assert!(guest["user_id"].is_null());
    assert!(guest["reviewed_by"].is_null());
    assert_eq!(guest["skills"], json!(["teaching", "cataloguing"]));

    // A signed-in applicant is linked to their account.
    let linked = expect_data(
        post_json_auth(
            app.clone(),
            "/api/v1/volunteer-applications",
            application("Helper", "helper@example.org"),
            &token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(linked["user_id"], user.id);

    let no_phone = json!({ "name": "No phone", "email": "np@example.org", "phone": "" });
    let response = post_json(app, "/api/v1/volunteer-applications", no_phone).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_stamps_reviewer_and_time(pool: PgPool) {
    let (admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let created = expect_data(
        post_json(
            app.clone(),
            "/api/v1/volunteer-applications",
            application("Priya", "priya@example.org"),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/v1/admin/volunteers/{}", created["id"]);

    let reviewed = expect_data(
        put_json_auth(
            app.clone(),
            &uri,
            json!({ "status": "approved", "notes": "Weekend library shifts" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(reviewed["status"], "approved");
    assert_eq!(reviewed["notes"], "Weekend library shifts");
    assert_eq!(reviewed["reviewed_by"], admin.id);
    assert!(reviewed["reviewed_at"].is_string());

    let response = put_json_auth(app.clone(), &uri, json!({ "status": "maybe" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let pending = expect_data(
        get_auth(app.clone(), "/api/v1/admin/volunteers?status=pending", &token).await,
        StatusCode::OK,
    )
    .await;
    assert!(pending.as_array().unwrap().is_empty());

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_queue_is_admin_only(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/volunteers", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
