//! Credential acquisition. The composer asks for a token right before each
//! request and drops it afterwards; nothing here caches.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ClientError;

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<String, ClientError>;
}

/// A fixed credential, e.g. a service token read from the environment.
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch_token(&self) -> Result<String, ClientError> {
        Ok(self.0.expose_secret().to_string())
    }
}
