//! Account routes. Accounts are keyed by the auth provider's subject; the
//! client registers (or refreshes) its profile after signing in.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bz_core::error::AppError;
use bz_core::models::User;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
}

impl RegisterUser {
    fn validate(&self) -> Result<(String, String), AppError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AppError::validation("username is required"));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(AppError::validation(format!("'{email}' is not an email address"))),
        }
        Ok((username.to_string(), email.to_string()))
    }
}

/// Creates the caller's account, or updates it when it already exists.
pub async fn register_user(
    State(state): State<SharedState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let (username, email) = body.validate()?;

    if let Some(owner) = state.users.find_user_by_username(&username).await? {
        if owner.subject != identity.subject {
            return Err(AppError::Conflict(format!("username '{username}' is taken")).into());
        }
    }

    let (user, status) = match state.users.find_user_by_subject(&identity.subject).await? {
        Some(existing) => (
            User {
                username,
                email,
                ..existing
            },
            StatusCode::OK,
        ),
        None => (
            User {
                id: Uuid::now_v7(),
                subject: identity.subject,
                username,
                email,
                created_at: Utc::now(),
            },
            StatusCode::CREATED,
        ),
    };

    state.users.save_user(user.clone()).await?;
    tracing::info!(id = %user.id, username = %user.username, "user saved");
    Ok((status, Json(user)))
}

pub async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users().await?))
}

pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User".to_string(), id.to_string()).into())
}
