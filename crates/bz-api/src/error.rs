//! Maps failures to HTTP responses.
//!
//! Every error becomes a JSON body of the form
//! `{"error": "<message>", "status": <code>}`.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bz_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    /// Domain errors raised inside plugins keep their meaning.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app) => Self::App(app),
            Err(other) => Self::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(AppError::NotFound(..)) => StatusCode::NOT_FOUND,
            Self::App(AppError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            Self::App(AppError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            Self::App(AppError::Conflict(_)) => StatusCode::CONFLICT,
            Self::App(AppError::Internal(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Multipart(e) => e.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_errors_keep_their_status() {
        let err: ApiError = anyhow::Error::new(AppError::validation("bad image")).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = anyhow::anyhow!("disk full").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn statuses() {
        let cases = [
            (AppError::NotFound("Item".into(), "1".into()), 404),
            (AppError::Unauthorized("no".into()), 401),
            (AppError::Conflict("taken".into()), 409),
            (AppError::Internal("db".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError::from(err).status_code().as_u16(), code);
        }
    }
}
