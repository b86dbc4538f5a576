//! # bz-api
//!
//! The web routing and orchestration layer for bazaar.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod state;

use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use bz_core::models::ListingKind;
use tower_http::services::ServeDir;

pub use error::ApiError;
pub use state::{AppState, SharedState};

/// Router-level knobs taken from the server settings.
#[derive(Debug, Clone)]
pub struct ApiOptions {
    /// Directory served under `media_url_prefix`; `None` disables static media.
    pub media_root: Option<PathBuf>,
    pub media_url_prefix: String,
    pub max_upload_bytes: usize,
}

/// Builds the application router.
///
/// User, item and course routes all live under the root path, matching
/// what the browser client calls.
pub fn router(state: SharedState, options: &ApiOptions) -> Router {
    let item = ListingKind::Item;
    let course = ListingKind::Course;

    let mut app = Router::new()
        .route(
            "/users",
            post(handlers::users::register_user).get(handlers::users::list_users),
        )
        .route("/users/{id}", get(handlers::users::get_user))
        .route(item.create_path(), post(handlers::listings::create_item))
        .route(item.list_path(), get(handlers::listings::list_items))
        .route("/items/{id}", get(handlers::listings::get_item))
        .route(course.create_path(), post(handlers::listings::create_course))
        .route(course.list_path(), get(handlers::listings::list_courses))
        .route("/courses/{id}", get(handlers::listings::get_course))
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .with_state(state);

    if let Some(root) = &options.media_root {
        app = app.nest_service(&options.media_url_prefix, ServeDir::new(root));
    }

    app.layer(middleware::trace_layer())
        .layer(middleware::cors_policy())
}
