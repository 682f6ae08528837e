//! HTTP-level integration tests for events and registrations.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{expect_data, get, get_auth, post_auth, post_json, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

async fn create_event(
    app: axum::Router,
    token: &str,
    title: &str,
    capacity: Option<i32>,
    published: bool,
) -> i64 {
    let body = json!({
        "title": title,
        "start_date": Utc::now() + Duration::days(10),
        "capacity": capacity,
        "is_published": published,
    });
    let data = expect_data(
        post_json_auth(app, "/api/v1/admin/events", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

fn attendee(name: &str, email: &str) -> serde_json::Value {
    json!({ "name": name, "email": email })
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn drafts_are_not_public(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let draft = create_event(app.clone(), &token, "Staff meeting", None, false).await;
    let published = create_event(app.clone(), &token, "Open day", None, true).await;

    let listed = expect_data(get(app.clone(), "/api/v1/events").await, StatusCode::OK).await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![published]);

    let response = get(app.clone(), &format!("/api/v1/events/{draft}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/events/{draft}/register");
    let response = post_json(app, &uri, attendee("Anu", "anu@example.org")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_registration_conflicts(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let event_id = create_event(app.clone(), &token, "Science fair", None, true).await;
    let uri = format!("/api/v1/events/{event_id}/register");

    let data = expect_data(
        post_json(app.clone(), &uri, attendee("Anu", "anu@example.org")).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(data["status"], "registered");

    let response = post_json(app, &uri, attendee("Anu again", "ANU@example.org")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_event_rejects_registration(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let event_id = create_event(app.clone(), &token, "Career camp", Some(1), true).await;
    let uri = format!("/api/v1/events/{event_id}/register");

    let response = post_json(app.clone(), &uri, attendee("First", "first@example.org")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(app.clone(), &uri, attendee("Second", "second@example.org")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let event = expect_data(
        get(app, &format!("/api/v1/events/{event_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(event["registered_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelling_frees_the_seat(pool: PgPool) {
    let (_admin, admin_token) =
        common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_user, token) = common::user_with_token(&pool, "guest@example.org", "user").await;
    let app = common::build_test_app(pool);

    let event_id = create_event(app.clone(), &admin_token, "Career camp", Some(1), true).await;
    let uri = format!("/api/v1/events/{event_id}/register");

    let registration = expect_data(
        post_json_auth(app.clone(), &uri, attendee("Guest", "guest@example.org"), &token).await,
        StatusCode::CREATED,
    )
    .await;
    let registration_id = registration["id"].as_i64().unwrap();

    let mine = expect_data(
        get_auth(app.clone(), "/api/v1/me/registrations", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let cancel_uri = format!("/api/v1/me/registrations/{registration_id}/cancel");
    let cancelled = expect_data(
        post_auth(app.clone(), &cancel_uri, &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cancelled["status"], "cancelled");

    let response = post_auth(app.clone(), &cancel_uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(app, &uri, attendee("Next", "next@example.org")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn others_cannot_cancel_a_registration(pool: PgPool) {
    let (_admin, admin_token) =
        common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_other, other_token) = common::user_with_token(&pool, "other@example.org", "user").await;
    let app = common::build_test_app(pool);

    let event_id = create_event(app.clone(), &admin_token, "Blood drive", None, true).await;
    let uri = format!("/api/v1/events/{event_id}/register");
    let registration = expect_data(
        post_json(app.clone(), &uri, attendee("Walk-in", "walkin@example.org")).await,
        StatusCode::CREATED,
    )
    .await;
    let registration_id = registration["id"].as_i64().unwrap();

    let cancel_uri = format!("/api/v1/me/registrations/{registration_id}/cancel");
    let response = post_auth(app, &cancel_uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn capacity_cannot_drop_below_registrations(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let event_id = create_event(app.clone(), &token, "Yoga morning", Some(5), true).await;
    let uri = format!("/api/v1/events/{event_id}/register");
    for i in 0..2 {
        let email = format!("p{i}@example.org");
        let response = post_json(app.clone(), &uri, attendee("P", &email)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = common::put_json_auth(
        app,
        &format!("/api/v1/admin/events/{event_id}"),
        json!({ "capacity": 1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reinstating_a_registration_respects_capacity(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let event_id = create_event(app.clone(), &token, "Science fair", Some(1), true).await;
    let uri = format!("/api/v1/events/{event_id}/register");
    let first = expect_data(
        post_json(app.clone(), &uri, attendee("First", "first@example.org")).await,
        StatusCode::CREATED,
    )
    .await;
    let first_uri = format!("/api/v1/admin/registrations/{}", first["id"]);

    let cancelled = expect_data(
        common::put_json_auth(app.clone(), &first_uri, json!({ "status": "cancelled" }), &token)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cancelled["status"], "cancelled");

    let response = post_json(app.clone(), &uri, attendee("Second", "second@example.org")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        common::put_json_auth(app.clone(), &first_uri, json!({ "status": "confirmed" }), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Non-seat changes on a full event still go through.
    let response =
        common::put_json_auth(app.clone(), &first_uri, json!({ "attended": false }), &token)
            .await;
    assert_eq!(response.status(), StatusCode::OK);

    let event = expect_data(
        get(app, &format!("/api/v1/events/{event_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(event["registered_count"], 1);
}
