//! HTTP-level integration tests for campaigns, donations and the export.

mod common;

use axum::http::StatusCode;
use common::{body_text, expect_data, get, get_auth, post_json, post_json_auth, put_json_auth};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

fn money(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .expect("money serializes as a string")
        .parse()
        .expect("money should parse as a decimal")
}

async fn create_campaign(app: axum::Router, token: &str, title: &str, active: bool) -> i64 {
    let body = json!({
        "title": title,
        "target_amount": "10000",
        "purpose": "education",
        "is_active": active,
    });
    let data = expect_data(
        post_json_auth(app, "/api/v1/admin/campaigns", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn campaign_slug_is_derived_from_title(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let id = create_campaign(app.clone(), &token, "School Kits 2025!", true).await;
    let data = expect_data(
        get(app, &format!("/api/v1/campaigns/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(data["slug"], "school-kits-2025");
    assert_eq!(money(&data["raised_amount"]), Decimal::ZERO);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_campaigns_are_hidden_publicly(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    create_campaign(app.clone(), &token, "Visible", true).await;
    create_campaign(app.clone(), &token, "Hidden", false).await;

    let data = expect_data(get(app.clone(), "/api/v1/campaigns").await, StatusCode::OK).await;
    let titles: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Visible"]);

    let all = expect_data(
        get_auth(app, "/api/v1/admin/campaigns", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_cannot_create_campaigns(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "user@example.org", "user").await;
    let app = common::build_test_app(pool);

    let body = json!({ "title": "Nope", "target_amount": "100" });
    let response = post_json_auth(app, "/api/v1/admin/campaigns", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_donation_starts_pending(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "donor_name": "Kavya",
        "donor_email": "Kavya@Example.org",
        "amount": "500",
        "purpose": "food",
    });
    let data = expect_data(
        post_json(app, "/api/v1/donations", body).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(data["payment_status"], "pending");
    assert_eq!(data["donor_email"], "kavya@example.org");
    assert_eq!(money(&data["amount"]), Decimal::from(500));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_amount_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "donor_name": "Zero", "amount": "0" });
    let response = post_json(app, "/api/v1/donations", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_donation_moves_campaign_total(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let campaign_id = create_campaign(app.clone(), &token, "Meals", true).await;
    let body = json!({ "campaign_id": campaign_id, "donor_name": "Ravi", "amount": "750" });
    let donation = expect_data(
        post_json(app.clone(), "/api/v1/donations", body).await,
        StatusCode::CREATED,
    )
    .await;
    let donation_id = donation["id"].as_i64().unwrap();
    let status_uri = format!("/api/v1/admin/donations/{donation_id}/status");

    let updated = expect_data(
        put_json_auth(app.clone(), &status_uri, json!({ "status": "completed" }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["payment_status"], "completed");

    let campaign = expect_data(
        get(app.clone(), &format!("/api/v1/campaigns/{campaign_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(money(&campaign["raised_amount"]), Decimal::from(750));

    let stats = expect_data(
        get(app.clone(), "/api/v1/donations/stats").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(money(&stats["total_amount"]), Decimal::from(750));

    // A completed donation can only be refunded, and a refund gives the money back.
    let response =
        put_json_auth(app.clone(), &status_uri, json!({ "status": "pending" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        put_json_auth(app.clone(), &status_uri, json!({ "status": "refunded" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let campaign = expect_data(
        get(app, &format!("/api/v1/campaigns/{campaign_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(money(&campaign["raised_amount"]), Decimal::ZERO);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_returns_csv_with_header(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let body = json!({ "donor_name": "Offline, Donor", "amount": "1200" });
    let created = expect_data(
        post_json_auth(app.clone(), "/api/v1/admin/donations", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["payment_status"], "completed");

    let response = get_auth(app, "/api/v1/admin/donations/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Date,Donor Name,Email"));
    let row = lines.next().unwrap();
    assert!(row.contains("\"Offline, Donor\""), "got: {row}");
    assert!(row.contains("1200.00"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_rows_match_the_filtered_list(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    for name in ["Walk-in One", "Walk-in Two"] {
        let body = json!({ "donor_name": name, "amount": "250" });
        let response = post_json_auth(app.clone(), "/api/v1/admin/donations", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let body = json!({ "donor_name": "Online Pledge", "amount": "900" });
    let response = post_json(app.clone(), "/api/v1/donations", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let completed = expect_data(
        get_auth(app.clone(), "/api/v1/admin/donations?status=completed", &token).await,
        StatusCode::OK,
    )
    .await;
    let filtered_len = completed.as_array().unwrap().len();
    assert_eq!(filtered_len, 2);

    let response = get_auth(app.clone(), "/api/v1/admin/donations/export?status=completed", &token)
        .await;
    let csv = body_text(response).await;
    assert_eq!(csv.lines().count(), filtered_len + 1);
    assert!(!csv.contains("Online Pledge"));

    let response = get_auth(app, "/api/v1/admin/donations/export?search=walk-in", &token).await;
    assert_eq!(body_text(response).await.lines().count(), 3);
}
