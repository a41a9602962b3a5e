//! Integration tests for signup, login and bearer token checks.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use sweet_bliss_api::middleware::REQUEST_ID_HEADER;
use sweet_bliss_api::services::auth::token::{Claims, TOKEN_ISSUER};
use sweet_bliss_integration_tests::{TEST_PASSWORD, TEST_TOKEN_SECRET, TestContext};

fn forge_token(secret: &str, sub: &str, issued: chrono::DateTime<Utc>, ttl: Duration) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        iat: issued.timestamp(),
        exp: (issued + ttl).timestamp(),
        iss: TOKEN_ISSUER.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("ok"));

    assert_eq!(ctx.get("/health/ready", None).await.status, StatusCode::OK);

    ctx.store.set_offline(true);
    assert_eq!(
        ctx.get("/health/ready", None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let ctx = TestContext::new();

    let ok = ctx.get("/health", None).await;
    assert!(ok.headers.contains_key(REQUEST_ID_HEADER));

    let unauthorized = ctx.get("/cart/get", None).await;
    assert!(unauthorized.headers.contains_key(REQUEST_ID_HEADER));
}

// =============================================================================
// Signup
// =============================================================================

#[tokio::test]
async fn test_signup_then_login() {
    let ctx = TestContext::new();

    let response = ctx
        .signup("Ada", "ada@example.com", "password123")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "ok" }));

    let response = ctx.login("ada@example.com", "password123").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let ctx = TestContext::new();
    ctx.signup("Ada", "ada@example.com", "password123").await;

    let response = ctx
        .signup("Second Ada", "ada@example.com", "different-pass")
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body,
        json!({ "status": "error", "msg": "Email already exists" })
    );
}

#[tokio::test]
async fn test_email_is_case_insensitive() {
    let ctx = TestContext::new();
    ctx.signup("Ada", "Ada@Example.com", "password123").await;

    let duplicate = ctx.signup("Ada", "ADA@EXAMPLE.COM", "password123").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let login = ctx.login("ada@example.COM", "password123").await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_validation() {
    let ctx = TestContext::new();

    for (name, email, password) in [
        ("", "ada@example.com", "password123"),
        ("Ada", "not-an-email", "password123"),
        ("Ada", "ada@example.com", "short"),
    ] {
        let response = ctx.signup(name, email, password).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{email}");
        assert_eq!(response.body["status"], "error");
    }
}

#[tokio::test]
async fn test_malformed_body_uses_error_shape() {
    let ctx = TestContext::new();

    let missing_field = ctx
        .post("/auth/signup", None, json!({ "email": "ada@example.com" }))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["status"], "error");

    let not_json = ctx
        .send_request(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(not_json.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_json.body["status"], "error");
}

#[tokio::test]
async fn test_store_outage_is_503_without_details() {
    let ctx = TestContext::new();
    ctx.store.set_offline(true);

    let response = ctx.signup("Ada", "ada@example.com", "password123").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["msg"], "Service temporarily unavailable");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = TestContext::new();
    ctx.signup("Ada", "ada@example.com", "password123").await;

    let response = ctx.login("ada@example.com", "password124").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({ "status": "error", "msg": "Invalid credentials" })
    );
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let ctx = TestContext::new();
    ctx.signup("Ada", "ada@example.com", "password123").await;

    let unknown = ctx.login("nobody@example.com", "password123").await;
    let wrong = ctx.login("ada@example.com", "wrong-password").await;

    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn test_me_returns_account_without_hash() {
    let ctx = TestContext::new();
    let token = ctx.signed_in("ada@example.com").await;

    let response = ctx.get("/auth/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "status": "ok",
            "user": { "id": 1, "name": "Test Baker", "email": "ada@example.com" }
        })
    );
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let ctx = TestContext::new();
    ctx.signed_in("ada@example.com").await;

    let forged = forge_token(
        "Zp4!rT8@mW2#xC6$vN0%bQ5^lK9&hJ3*",
        "1",
        Utc::now(),
        Duration::hours(1),
    );
    let response = ctx.get("/cart/get", Some(&forged)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["msg"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let ctx = TestContext::new();
    ctx.signed_in("ada@example.com").await;

    let expired = forge_token(
        TEST_TOKEN_SECRET,
        "1",
        Utc::now() - Duration::days(2),
        Duration::hours(24),
    );
    let response = ctx.get("/cart/get", Some(&expired)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], "error");
}

#[tokio::test]
async fn test_me_for_deleted_or_unknown_user() {
    let ctx = TestContext::new();

    // Correctly signed, but no such account.
    let token = forge_token(TEST_TOKEN_SECRET, "99", Utc::now(), Duration::hours(1));
    let response = ctx.get("/auth/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_each_login_issues_working_token() {
    let ctx = TestContext::new();
    let first = ctx.signed_in("ada@example.com").await;
    let second = ctx.login("ada@example.com", TEST_PASSWORD).await.body["token"]
        .as_str()
        .unwrap()
        .to_string();

    for token in [first, second] {
        assert_eq!(ctx.get("/auth/me", Some(&token)).await.status, StatusCode::OK);
    }
}
