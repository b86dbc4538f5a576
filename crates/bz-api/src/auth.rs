//! Bearer-token extraction for the routes that create records.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bz_core::error::AppError;
use bz_core::models::Identity;

use crate::error::ApiError;
use crate::state::SharedState;

/// The verified caller. Rejects the request with 401 when the
/// `Authorization: Bearer <token>` header is missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
        let identity = state.auth.verify_bearer(token).await?;
        Ok(Self(identity))
    }
}
