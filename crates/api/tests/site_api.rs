//! HTTP-level integration tests for site settings, testimonials, contact
//! inquiries, the member directory and the landing-page overview.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_data, get, get_auth, post_auth, post_json, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_are_served_as_a_map(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_user, user_token) = common::user_with_token(&pool, "user@example.org", "user").await;
    let app = common::build_test_app(pool);

    let saved = expect_data(
        put_json_auth(
            app.clone(),
            "/api/v1/admin/settings/site.name",
            json!({ "value": "Sangam Trust" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(saved["key"], "site.name");

    let response = put_json_auth(
        app.clone(),
        "/api/v1/admin/settings/contact.phone",
        json!({ "value": { "primary": "+91 98450 00000" } }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Upserting the same key replaces its value.
    let response = put_json_auth(
        app.clone(),
        "/api/v1/admin/settings/site.name",
        json!({ "value": "Sangam Foundation" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let settings = expect_data(
        get(app.clone(), "/api/v1/site/settings").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(settings["site.name"], "Sangam Foundation");
    assert_eq!(settings["contact.phone"]["primary"], "+91 98450 00000");
    assert_eq!(settings.as_object().unwrap().len(), 2);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/admin/settings/Site_Name",
        json!({ "value": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app,
        "/api/v1/admin/settings/site.name",
        json!({ "value": "x" }),
        &user_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Testimonials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_testimonials_wait_for_approval(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Lakshmi",
        "content": "The reading room changed my exam preparation.",
        "rating": 4,
        "is_approved": true,
        "is_featured": true,
    });
    let submitted = expect_data(
        post_json(app.clone(), "/api/v1/site/testimonials", body).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(submitted["is_approved"], false);
    assert_eq!(submitted["is_featured"], false);
    assert_eq!(submitted["rating"], 4);

    let public = expect_data(
        get(app.clone(), "/api/v1/site/testimonials").await,
        StatusCode::OK,
    )
    .await;
    assert!(public.as_array().unwrap().is_empty());

    let uri = format!("/api/v1/admin/testimonials/{}/toggle-approved", submitted["id"]);
    let approved = expect_data(post_auth(app.clone(), &uri, &token).await, StatusCode::OK).await;
    assert_eq!(approved["is_approved"], true);

    let public = expect_data(get(app, "/api/v1/site/testimonials").await, StatusCode::OK).await;
    assert_eq!(public.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn testimonial_rating_must_be_one_to_five(pool: PgPool) {
    let app = common::build_test_app(pool);

    for rating in [0, 6] {
        let body = json!({ "name": "Out of range", "content": "Great", "rating": rating });
        let response = post_json(app.clone(), "/api/v1/site/testimonials", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "rating {rating}");
    }

    let body = json!({ "name": "Default rating", "content": "Great" });
    let created = expect_data(
        post_json(app, "/api/v1/site/testimonials", body).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["rating"], 5);
}

// ---------------------------------------------------------------------------
// Contact inquiries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_inquiries_start_new(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Suresh",
        "email": " Suresh@Example.org ",
        "subject": "Book drive",
        "message": "Can we drop off 40 textbooks on Sunday?",
    });
    let inquiry = expect_data(
        post_json(app.clone(), "/api/v1/site/contact", body).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(inquiry["status"], "new");
    assert_eq!(inquiry["email"], "suresh@example.org");

    let bad = json!({ "name": "No email", "email": "nope", "message": "hi" });
    let response = post_json(app.clone(), "/api/v1/site/contact", bad).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/admin/contact/{}", inquiry["id"]);
    let resolved = expect_data(
        put_json_auth(app.clone(), &uri, json!({ "status": "resolved" }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(resolved["status"], "resolved");

    let response = put_json_auth(app.clone(), &uri, json!({ "status": "archived" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let open = expect_data(
        get_auth(app, "/api/v1/admin/contact?status=new", &token).await,
        StatusCode::OK,
    )
    .await;
    assert!(open.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Members and overview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn members_are_public_once_approved_and_soft_deleted(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let member = expect_data(
        common::post_json_auth(
            app.clone(),
            "/api/v1/admin/members",
            json!({ "name": "Gopal", "member_type": "mentor", "village": "Hosur" }),
            &token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(member["is_approved"], false);
    assert_eq!(member["is_active"], true);
    let member_id = member["id"].as_i64().unwrap();

    let public = expect_data(get(app.clone(), "/api/v1/site/members").await, StatusCode::OK).await;
    assert!(public.as_array().unwrap().is_empty());

    let approve_uri = format!("/api/v1/admin/members/{member_id}/approve");
    let approved = expect_data(
        post_auth(app.clone(), &approve_uri, &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(approved["is_approved"], true);

    let overview = expect_data(
        get(app.clone(), "/api/v1/site/overview").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(overview["active_members"], 1);
    assert_eq!(overview["upcoming_events"], 0);

    let public = expect_data(get(app.clone(), "/api/v1/site/members").await, StatusCode::OK).await;
    assert_eq!(public.as_array().unwrap().len(), 1);

    let member_uri = format!("/api/v1/admin/members/{member_id}");
    let response = delete_auth(app.clone(), &member_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app.clone(), &member_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let public = expect_data(get(app.clone(), "/api/v1/site/members").await, StatusCode::OK).await;
    assert!(public.as_array().unwrap().is_empty());

    // The row is kept, only marked inactive.
    let all = expect_data(
        get_auth(app, "/api/v1/admin/members", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["is_active"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_member_type_is_rejected(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let response = common::post_json_auth(
        app,
        "/api/v1/admin/members",
        json!({ "name": "Nobody", "member_type": "sponsor" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
