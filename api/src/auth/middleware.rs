//! Bearer token authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::domain::Actor;
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Extract the bearer token from the Authorization header
fn extract_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Verifies the bearer token, reloads the user it names and injects the
/// resulting [`Actor`] into request extensions. The admin flag comes from the
/// stored user, so a revoked admin loses privileges before the token expires.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request).ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized
    })?;

    let user = match state.catalog.users.get(&claims.sub).await {
        Ok(user) => user,
        Err(DomainError::NotFound(_)) => {
            tracing::debug!(user_id = %claims.sub, "Token names an unknown user");
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    request
        .extensions_mut()
        .insert(Actor::new(user.id(), user.is_admin));

    Ok(next.run(request).await)
}
