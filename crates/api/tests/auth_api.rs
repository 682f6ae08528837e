//! HTTP-level integration tests for signup, login, sessions and lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_data, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_creates_user_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "email": "  Asha@Example.org ",
        "password": "long-enough-pass",
        "full_name": "Asha Verma",
    });
    let data = expect_data(
        post_json(app, "/api/v1/auth/signup", body).await,
        StatusCode::CREATED,
    )
    .await;

    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert_eq!(data["user"]["email"], "asha@example.org");
    assert_eq!(data["user"]["role"], "user");
    assert!(data["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_duplicate_email_conflicts(pool: PgPool) {
    common::create_user(&pool, "taken@example.org", "user").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "email": "TAKEN@example.org",
        "password": "long-enough-pass",
        "full_name": "Someone Else",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "email": "short@example.org",
        "password": "short",
        "full_name": "Short Pass",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Login and lockout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_valid_credentials(pool: PgPool) {
    let user = common::create_user(&pool, "login@example.org", "librarian").await;
    let app = common::build_test_app(pool);

    let data = expect_data(
        login(app, "login@example.org", TEST_PASSWORD).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(data["user"]["id"], user.id);
    assert_eq!(data["user"]["role"], "librarian");
    assert!(data["expires_in"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_wrong_password_is_unauthorized(pool: PgPool) {
    common::create_user(&pool, "wrong@example.org", "user").await;
    let app = common::build_test_app(pool);

    let response = login(app, "wrong@example.org", "not-the-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_unknown_email_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = login(app, "nobody@example.org", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_locks_after_repeated_failures(pool: PgPool) {
    common::create_user(&pool, "locked@example.org", "user").await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let response = login(app.clone(), "locked@example.org", "bad-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is refused while the lock holds.
    let response = login(app, "locked@example.org", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_lock_starts_a_fresh_failure_window(pool: PgPool) {
    common::create_user(&pool, "relock@example.org", "user").await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..5 {
        login(app.clone(), "relock@example.org", "bad-password").await;
    }
    sqlx::query(
        "UPDATE profiles SET locked_until = NOW() - INTERVAL '1 minute'
         WHERE email = 'relock@example.org'",
    )
    .execute(&pool)
    .await
    .unwrap();

    // One miss after the lock lapses is not five in a row.
    let response = login(app.clone(), "relock@example.org", "bad-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(app, "relock@example.org", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_token_is_single_use(pool: PgPool) {
    common::create_user(&pool, "rotate@example.org", "user").await;
    let app = common::build_test_app(pool);

    let data = expect_data(
        login(app.clone(), "rotate@example.org", TEST_PASSWORD).await,
        StatusCode::OK,
    )
    .await;
    let refresh_token = data["refresh_token"].as_str().unwrap().to_string();

    let first = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    let rotated = expect_data(first, StatusCode::OK).await;
    assert_ne!(rotated["refresh_token"], data["refresh_token"]);

    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_own_profile(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "me@example.org", "user").await;
    let app = common::build_test_app(pool);

    let data = expect_data(
        get_auth(app, "/api/v1/auth/me", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(data["id"], user.id);
    assert_eq!(data["email"], "me@example.org");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "pw@example.org", "user").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "current_password": "not-the-password",
        "new_password": "brand-new-password",
    });
    let response = post_json_auth(app, "/api/v1/auth/me/password", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn forgot_password_always_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/forgot-password",
        json!({ "email": "unknown@example.org" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}
