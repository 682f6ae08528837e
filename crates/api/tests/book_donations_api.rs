//! HTTP-level integration tests for book donation pledges.

mod common;

use axum::http::StatusCode;
use common::{body_text, expect_data, get_auth, post_json, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

async fn pledge(app: axum::Router, donor: &str, title: &str, quantity: i32) -> serde_json::Value {
    let body = json!({
        "donor_name": donor,
        "book_title": title,
        "quantity": quantity,
    });
    expect_data(
        post_json(app, "/api/v1/book-donations", body).await,
        StatusCode::CREATED,
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pledges_start_pending_with_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);

    let donation = pledge(app.clone(), "Anita", "Wings of Fire", 3).await;
    assert_eq!(donation["status"], "pending");
    assert_eq!(donation["condition"], "good");
    assert_eq!(donation["quantity"], 3);
    assert!(donation["received_at"].is_null());

    let body = json!({ "donor_name": "Anita", "book_title": "Zero", "quantity": 0 });
    let response = post_json(app.clone(), "/api/v1/book-donations", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "donor_name": "", "book_title": "Untitled" });
    let response = post_json(app, "/api/v1/book-donations", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn receiving_stamps_the_reviewer(pool: PgPool) {
    let (admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let donation = pledge(app.clone(), "Farid", "Godaan", 1).await;
    let uri = format!("/api/v1/admin/book-donations/{}/status", donation["id"]);

    let received = expect_data(
        put_json_auth(app.clone(), &uri, json!({ "status": "received" }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(received["status"], "received");
    assert_eq!(received["received_by"], admin.id);
    assert!(received["received_at"].is_string());

    let response = put_json_auth(app, &uri, json!({ "status": "lost" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_sum_quantities(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_user, user_token) = common::user_with_token(&pool, "user@example.org", "user").await;
    let app = common::build_test_app(pool);

    pledge(app.clone(), "Meena", "Malgudi Days", 4).await;
    let second = pledge(app.clone(), "Meena", "Swami and Friends", 2).await;
    let uri = format!("/api/v1/admin/book-donations/{}/status", second["id"]);
    let response = put_json_auth(app.clone(), &uri, json!({ "status": "received" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats = expect_data(
        get_auth(app.clone(), "/api/v1/admin/book-donations/stats", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["received"], 1);
    assert_eq!(stats["total_books"], 6);

    let response = get_auth(app, "/api/v1/admin/book-donations/stats", &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_rows_match_the_filtered_list(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    pledge(app.clone(), "Ravi", "Panchatantra", 1).await;
    pledge(app.clone(), "Ravi", "Jataka Tales", 1).await;
    let body = json!({ "donor_name": "Desk entry", "book_title": "Atlas", "quantity": 2 });
    let response =
        post_json_auth(app.clone(), "/api/v1/admin/book-donations", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let filtered = expect_data(
        get_auth(app.clone(), "/api/v1/admin/book-donations?search=ravi", &token).await,
        StatusCode::OK,
    )
    .await;
    let filtered_len = filtered.as_array().unwrap().len();
    assert_eq!(filtered_len, 2);

    let response = get_auth(app, "/api/v1/admin/book-donations/export?search=ravi", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let csv = body_text(response).await;
    assert_eq!(csv.lines().count(), filtered_len + 1);
    assert!(!csv.contains("Atlas"));
}
