//! HTTP-level integration tests for the signed-in user's dashboard.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{expect_data, get, get_auth, post_auth, post_json, post_json_auth};
use rust_decimal::Decimal;
use sangam_db::models::notification::CreateNotification;
use sangam_db::repositories::NotificationRepo;
use serde_json::json;
use sqlx::PgPool;

async fn create_event(app: axum::Router, token: &str, title: &str) -> i64 {
    let body = json!({
        "title": title,
        "start_date": Utc::now() + Duration::days(7),
        "capacity": 1,
        "is_published": true,
    });
    let data = expect_data(
        post_json_auth(app, "/api/v1/admin/events", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

async fn notify(pool: &PgPool, user_id: i64, title: &str) -> i64 {
    let input = CreateNotification {
        user_id,
        title: title.to_string(),
        message: format!("{title} body"),
        kind: "info".to_string(),
        link: None,
    };
    NotificationRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Summary and registrations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_counts_rows_matched_by_email(pool: PgPool) {
    let (_admin, admin_token) =
        common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_user, token) = common::user_with_token(&pool, "reader@example.org", "user").await;
    let app = common::build_test_app(pool);

    // Made as a guest, before signing in, with the account's email.
    let event_id = create_event(app.clone(), &admin_token, "Story hour").await;
    let uri = format!("/api/v1/events/{event_id}/register");
    let registration = expect_data(
        post_json(
            app.clone(),
            &uri,
            json!({ "name": "Reader", "email": "Reader@Example.org" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let offline = json!({
        "donor_name": "Reader",
        "donor_email": "reader@example.org",
        "amount": "750",
    });
    let response =
        post_json_auth(app.clone(), "/api/v1/admin/donations", offline, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let pledge = json!({
        "donor_name": "Reader",
        "donor_email": "reader@example.org",
        "amount": "100",
    });
    let response = post_json(app.clone(), "/api/v1/donations", pledge).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let summary = expect_data(
        get_auth(app.clone(), "/api/v1/me/summary", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(summary["registrations"], 1);
    assert_eq!(summary["donations"], 2);
    let donated: Decimal = summary["donated_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(donated, Decimal::from(750));
    assert_eq!(summary["active_book_issues"], 0);

    // The guest registration can be cancelled from the dashboard.
    let cancel_uri = format!("/api/v1/me/registrations/{}/cancel", registration["id"]);
    let cancelled = expect_data(
        post_auth(app.clone(), &cancel_uri, &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cancelled["status"], "cancelled");

    let summary = expect_data(
        get_auth(app.clone(), "/api/v1/me/summary", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(summary["registrations"], 0);

    let event = expect_data(
        get(app, &format!("/api/v1/events/{event_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(event["registered_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_requires_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/me/summary").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_mark_read_one_and_all(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "reader@example.org", "user").await;
    let (other, other_token) = common::user_with_token(&pool, "other@example.org", "user").await;
    let first = notify(&pool, user.id, "Donation confirmed").await;
    notify(&pool, user.id, "Registration confirmed").await;
    notify(&pool, user.id, "Membership reviewed").await;
    notify(&pool, other.id, "Someone else's").await;
    let app = common::build_test_app(pool);

    let unread = expect_data(
        get_auth(app.clone(), "/api/v1/me/notifications?unread_only=true", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(unread.as_array().unwrap().len(), 3);

    let read_uri = format!("/api/v1/me/notifications/{first}/read");
    let response = post_auth(app.clone(), &read_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    // Marking again is still a success.
    let response = post_auth(app.clone(), &read_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Another account cannot touch it; their own stays unread.
    let response = post_auth(app.clone(), &read_uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let summary = expect_data(
        get_auth(app.clone(), "/api/v1/me/summary", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(summary["unread_notifications"], 2);

    let marked = expect_data(
        post_auth(app.clone(), "/api/v1/me/notifications/read-all", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(marked["updated"], 2);

    let all = expect_data(
        get_auth(app.clone(), "/api/v1/me/notifications", &token).await,
        StatusCode::OK,
    )
    .await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|n| n["is_read"] == true));

    let theirs = expect_data(
        get_auth(app, "/api/v1/me/notifications?unread_only=true", &other_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(theirs.as_array().unwrap().len(), 1);
}
