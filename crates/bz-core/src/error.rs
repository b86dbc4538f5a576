//! # AppError
//!
//! Centralized error handling for the bazaar ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all bz-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., User, Item, Course)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., short description too short, too many tags)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Missing or rejected bearer credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down, disk full)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Resource already exists (e.g., username owned by another account)
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

/// A specialized Result type for bazaar logic.
pub type Result<T> = std::result::Result<T, AppError>;
