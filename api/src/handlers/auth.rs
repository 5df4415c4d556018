//! Login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::payload;
use crate::error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// POST /auth/login
///
/// Exchange an email/password pair for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let request = payload(body)?;
    let user = state
        .catalog
        .users
        .authenticate(request.email.trim(), &request.password)
        .await?;

    let access_token = state
        .tokens
        .issue(user.id(), user.is_admin)
        .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))?;

    tracing::info!(user_id = %user.id(), "User logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_seconds(),
    }))
}
