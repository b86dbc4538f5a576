//! # bz-auth-jwt
//!
//! HS256 implementation of `AuthProvider`.
//! Verifies the bearer tokens the client fetches from the identity provider
//! right before each submission.

use async_trait::async_trait;
use bz_core::error::AppError;
use bz_core::models::Identity;
use bz_core::traits::AuthProvider;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Claims read from a bearer token. `exp` is enforced by the validator.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    username: Option<String>,
}

pub struct JwtAuthProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthProvider {
    /// Accepts the shared signing secret (e.g., from the `JWT_SECRET` variable)
    pub fn new(secret: &SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn verify_bearer(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::Unauthorized("invalid or expired token".to_string())
        })?;
        Ok(Identity {
            subject: data.claims.sub,
            username: data.claims.username,
        })
    }
}
