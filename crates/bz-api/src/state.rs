use std::sync::Arc;

use bz_core::traits::{AuthProvider, ListingRepo, MediaStore, UserRepo};

/// State shared across all request handlers.
pub struct AppState {
    pub listings: Box<dyn ListingRepo>,
    pub users: Box<dyn UserRepo>,
    pub store: Box<dyn MediaStore>,
    pub auth: Box<dyn AuthProvider>,
}

pub type SharedState = Arc<AppState>;
