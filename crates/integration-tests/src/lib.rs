//! Integration tests for Sweet Bliss.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store, no database needed
//! cargo test -p sweet-bliss-integration-tests
//!
//! # Also exercise the PostgreSQL repositories (ignored by default)
//! SWEETBLISS_TEST_DATABASE_URL=postgres://localhost/sweet_bliss_test \
//!     cargo test -p sweet-bliss-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Signup, login, token checks
//! - `cart_flow` - Cart operations through the HTTP layer
//! - `postgres_store` - Repository behaviour against a real database

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use sweet_bliss_api::config::TokenConfig;
use sweet_bliss_api::db::memory::MemoryStore;
use sweet_bliss_api::routes;
use sweet_bliss_api::state::AppState;

/// Signing secret shared by the app under test and tests that forge tokens.
pub const TEST_TOKEN_SECRET: &str = "k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j";

/// Password used by [`TestContext::signed_in`].
pub const TEST_PASSWORD: &str = "sprinkles-and-glaze";

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, or the raw text as a JSON string if the body is not JSON.
    pub body: Value,
}

/// The full router over a fresh in-memory store.
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::in_memory(&token_config(), Arc::clone(&store));

        Self {
            app: routes::app(state),
            store,
        }
    }

    /// Send a request through the router.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Send a prebuilt request through the router.
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/signup",
            None,
            serde_json::json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Sign up `email` with [`TEST_PASSWORD`], log in and return the token.
    pub async fn signed_in(&self, email: &str) -> String {
        let response = self.signup("Test Baker", email, TEST_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let response = self.login(email, TEST_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        response.body["token"].as_str().unwrap().to_string()
    }

    /// The caller's cart as returned by `GET /cart/get`.
    pub async fn cart(&self, token: &str) -> Value {
        let response = self.get("/cart/get", Some(token)).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body
    }
}

/// Token configuration matching [`TEST_TOKEN_SECRET`].
#[must_use]
pub fn token_config() -> TokenConfig {
    TokenConfig::new(SecretString::from(TEST_TOKEN_SECRET))
}
