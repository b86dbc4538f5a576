use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("could not obtain a token: {0}")]
    Token(String),
}
