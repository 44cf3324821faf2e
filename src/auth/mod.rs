//! Authentication: registration, login, JWT validation and session
//! handling, plus the per-user rate limiter for expensive endpoints.

pub mod handlers;
mod rate_limit;
mod service;

pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use service::{AuthService, Claims};

use actix_web::HttpRequest;

use crate::db::models::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Pulls the bearer token out of the Authorization header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::AuthError(AuthError::InvalidToken))
}

/// Resolves the requesting user from the Authorization header.
/// Every protected handler goes through this.
pub async fn current_user(req: &HttpRequest, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(req)?;
    state.auth.validate_token(token).await
}
