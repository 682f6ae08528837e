//! HTTP-level integration tests for the public finance ledger.

mod common;

use axum::http::StatusCode;
use common::{body_text, expect_data, get, get_auth, post_auth, post_json_auth};
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

async fn record(
    app: axum::Router,
    token: &str,
    kind: &str,
    category: &str,
    amount: &str,
) -> serde_json::Value {
    let body = json!({
        "transaction_type": kind,
        "category": category,
        "amount": amount,
        "transaction_date": "2025-06-01",
    });
    expect_data(
        post_json_auth(app, "/api/v1/admin/transactions", body, token).await,
        StatusCode::CREATED,
    )
    .await
}

async fn verify(app: axum::Router, token: &str, transaction: &serde_json::Value) {
    let uri = format!("/api/v1/admin/transactions/{}/verify", transaction["id"]);
    let verified = expect_data(post_auth(app, &uri, token).await, StatusCode::OK).await;
    assert_eq!(verified["verified"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_counts_only_verified_entries(pool: PgPool) {
    let (admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    let grant = record(app.clone(), &token, "income", "grants", "1000").await;
    let rent = record(app.clone(), &token, "expense", "rent", "300").await;
    let pending = record(app.clone(), &token, "income", "donations", "500").await;
    assert_eq!(pending["verified"], false);
    assert_eq!(grant["added_by"], admin.id);

    let summary = expect_data(
        get(app.clone(), "/api/v1/transparency/summary").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(money(&summary["income"]), Decimal::ZERO);

    verify(app.clone(), &token, &grant).await;
    verify(app.clone(), &token, &rent).await;

    let summary = expect_data(
        get(app.clone(), "/api/v1/transparency/summary").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(money(&summary["income"]), Decimal::from(1000));
    assert_eq!(money(&summary["expense"]), Decimal::from(300));
    assert_eq!(money(&summary["balance"]), Decimal::from(700));

    let public = expect_data(
        get(app.clone(), "/api/v1/transparency/transactions").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(public.as_array().unwrap().len(), 2);

    let outside = expect_data(
        get(app, "/api/v1/transparency/summary?from=2025-07-01").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(money(&outside["balance"]), Decimal::ZERO);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ledger_entries_are_validated(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let (_user, user_token) = common::user_with_token(&pool, "user@example.org", "user").await;
    let app = common::build_test_app(pool);

    let cases = [
        json!({ "transaction_type": "transfer", "category": "misc", "amount": "10" }),
        json!({ "transaction_type": "income", "category": "", "amount": "10" }),
        json!({ "transaction_type": "income", "category": "misc", "amount": "-5" }),
    ];
    for body in cases {
        let response =
            post_json_auth(app.clone(), "/api/v1/admin/transactions", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }

    let body = json!({ "transaction_type": "income", "category": "misc", "amount": "10" });
    let response = post_json_auth(app, "/api/v1/admin/transactions", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_rows_match_the_filtered_list(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "admin@example.org", "admin").await;
    let app = common::build_test_app(pool);

    record(app.clone(), &token, "income", "grants", "1000").await;
    record(app.clone(), &token, "income", "donations", "250.5").await;
    record(app.clone(), &token, "expense", "stationery", "80").await;

    let incomes = expect_data(
        get_auth(app.clone(), "/api/v1/admin/transactions?transaction_type=income", &token).await,
        StatusCode::OK,
    )
    .await;
    let filtered_len = incomes.as_array().unwrap().len();
    assert_eq!(filtered_len, 2);

    let response = get_auth(
        app,
        "/api/v1/admin/transactions/export?transaction_type=income",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Date,Type,Category,Description,Amount,Verified"));
    assert!(csv.contains("250.50"));
    assert!(!csv.contains("stationery"));
    assert_eq!(csv.lines().count(), filtered_len + 1);
}
