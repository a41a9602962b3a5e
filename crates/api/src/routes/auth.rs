//! Auth route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiJson, StatusResponse};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Signup request body.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub status: &'static str,
    pub user: User,
}

/// Create an account. No token is issued; the client logs in afterwards.
///
/// POST /auth/signup
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<Json<StatusResponse>> {
    AuthService::new(state.users(), state.tokens())
        .signup(&req.name, &req.email, &req.password)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// Exchange email and password for a bearer token.
///
/// POST /auth/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (_, token) = AuthService::new(state.users(), state.tokens())
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        status: "ok",
        token,
    }))
}

/// The authenticated account.
///
/// GET /auth/me
#[instrument(skip(state))]
pub async fn me(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>> {
    let user = AuthService::new(state.users(), state.tokens())
        .get_user(user_id)
        .await?;

    Ok(Json(MeResponse { status: "ok", user }))
}
