//! Auth Handlers
//!
//! HTTP request handlers for registration, login and logout.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::models::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, RegisterResponse};

use super::AppState;

/// Handler for POST /api/register
///
/// Registers a new user. The body's `token` field must carry the admin
/// token.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    state.auth.register(&req.token, &req.login, &req.pswd).await?;
    Ok(Json(RegisterResponse::new(req.login)))
}

/// Handler for POST /api/auth
///
/// Verifies credentials and returns a fresh session token.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let token = state.auth.login(&req.login, &req.pswd).await?;
    Ok(Json(AuthResponse::new(token)))
}

/// Handler for DELETE /api/auth/:token
///
/// Closes the session carried in the path.
pub async fn logout_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<LogoutResponse>> {
    state.auth.logout(&token).await?;
    Ok(Json(LogoutResponse::new()))
}
