//! HTTP-level integration tests for the catalogue and the library desk.

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_data, get, get_auth, post_auth, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_book(app: axum::Router, token: &str, accession: &str, copies: i32) -> i64 {
    let body = json!({
        "accession_number": accession,
        "title": "Wings of Fire",
        "author": "A. P. J. Abdul Kalam",
        "category": "self-help",
        "total_copies": copies,
    });
    let data = expect_data(
        post_json_auth(app, "/api/v1/library/books", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

async fn create_patron(app: axum::Router, token: &str, code: &str, max_books: i32) -> i64 {
    let body = json!({
        "patron_code": code,
        "name": "Meena Kumari",
        "max_books_allowed": max_books,
    });
    let data = expect_data(
        post_json_auth(app, "/api/v1/library/patrons", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

async fn issue(
    app: axum::Router,
    token: &str,
    book_id: i64,
    patron_id: i64,
) -> axum::response::Response {
    post_json_auth(
        app,
        "/api/v1/library/issues",
        json!({ "book_id": book_id, "patron_id": patron_id }),
        token,
    )
    .await
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn librarian_creates_book_visible_publicly(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let id = create_book(app.clone(), &token, "ACC-001", 2).await;

    let data = expect_data(get(app, &format!("/api/v1/books/{id}")).await, StatusCode::OK).await;
    assert_eq!(data["title"], "Wings of Fire");
    assert_eq!(data["total_copies"], 2);
    assert_eq!(data["available_copies"], 2);
    assert_eq!(data["status"], "available");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plain_user_cannot_create_books(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "reader@example.org", "user").await;
    let app = common::build_test_app(pool);

    let body = json!({ "accession_number": "ACC-002", "title": "Godaan" });
    let response = post_json_auth(app, "/api/v1/library/books", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_accession_number_conflicts(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    create_book(app.clone(), &token, "ACC-DUP", 1).await;
    let body = json!({ "accession_number": "ACC-DUP", "title": "Another" });
    let response = post_json_auth(app, "/api/v1/library/books", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_category_is_rejected(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let body = json!({ "accession_number": "ACC-003", "title": "Odd", "category": "poetry" });
    let response = post_json_auth(app, "/api/v1/library/books", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Issue and return
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn issuing_last_copy_marks_book_borrowed(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let book_id = create_book(app.clone(), &token, "ACC-010", 1).await;
    let patron_id = create_patron(app.clone(), &token, "P-010", 3).await;

    let issued = expect_data(
        issue(app.clone(), &token, book_id, patron_id).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(issued["status"], "issued");

    let book = expect_data(
        get(app.clone(), &format!("/api/v1/books/{book_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(book["available_copies"], 0);
    assert_eq!(book["status"], "borrowed");

    // No copies left for a second patron.
    let other = create_patron(app.clone(), &token, "P-011", 3).await;
    let response = issue(app, &token, book_id, other).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn borrow_limit_is_enforced(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let first = create_book(app.clone(), &token, "ACC-020", 1).await;
    let second = create_book(app.clone(), &token, "ACC-021", 1).await;
    let patron_id = create_patron(app.clone(), &token, "P-020", 1).await;

    let response = issue(app.clone(), &token, first, patron_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = issue(app, &token, second, patron_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn returning_restores_copy_and_second_return_conflicts(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let book_id = create_book(app.clone(), &token, "ACC-030", 1).await;
    let patron_id = create_patron(app.clone(), &token, "P-030", 3).await;
    let issued = expect_data(
        issue(app.clone(), &token, book_id, patron_id).await,
        StatusCode::CREATED,
    )
    .await;
    let issue_id = issued["id"].as_i64().unwrap();

    let uri = format!("/api/v1/library/issues/{issue_id}/return");
    let returned = expect_data(post_auth(app.clone(), &uri, &token).await, StatusCode::OK).await;
    assert_eq!(returned["status"], "returned");
    assert!(returned["return_date"].is_string());

    let book = expect_data(
        get(app.clone(), &format!("/api/v1/books/{book_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(book["available_copies"], 1);
    assert_eq!(book["status"], "available");

    let again = post_auth(app, &uri, &token).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_counts_active_issues(pool: PgPool) {
    let (_lib, token) = common::user_with_token(&pool, "lib@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let book_id = create_book(app.clone(), &token, "ACC-040", 3).await;
    let patron_id = create_patron(app.clone(), &token, "P-040", 3).await;
    let response = issue(app.clone(), &token, book_id, patron_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = expect_data(
        get_auth(app, "/api/v1/library/dashboard", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(data["total_books"], 1);
    assert_eq!(data["total_copies"], 3);
    assert_eq!(data["available_copies"], 2);
    assert_eq!(data["total_patrons"], 1);
    assert_eq!(data["active_issues"], 1);
    assert_eq!(data["overdue_issues"], 0);
}
