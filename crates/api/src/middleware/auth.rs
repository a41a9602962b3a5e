//! Authentication extractor.
//!
//! Provides [`RequireAuth`] for requiring a valid bearer token in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use sweet_bliss_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::TokenError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor that requires a valid bearer token.
///
/// Resolves the owner identity from `Authorization: Bearer <token>`. Put it
/// first in the handler's argument list so that it runs before any body
/// extractor; an unauthenticated request is then rejected with 401 whatever
/// its payload.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user_id): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {user_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub UserId);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("No token".to_string()))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        let user_id = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            match e {
                TokenError::Expired => AppError::Unauthorized("Token expired".to_string()),
                _ => AppError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        tracing::Span::current().record("user_id", tracing::field::display(user_id));
        set_sentry_user(&user_id);

        Ok(Self(user_id))
    }
}
