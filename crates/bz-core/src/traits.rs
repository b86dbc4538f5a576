//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use crate::error::AppError;
use crate::models::{Identity, Listing, ListingFilter, ListingKind, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Document persistence contract for items and courses.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ListingRepo: Send + Sync {
    async fn create_listing(&self, listing: Listing) -> anyhow::Result<()>;
    async fn get_listing(&self, kind: ListingKind, id: Uuid) -> anyhow::Result<Option<Listing>>;
    /// Newest first.
    async fn list_listings(
        &self,
        kind: ListingKind,
        filter: ListingFilter,
    ) -> anyhow::Result<Vec<Listing>>;
}

/// Document persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Inserts the user, or replaces the stored document with the same id.
    async fn save_user(&self, user: User) -> anyhow::Result<()>;
    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_user_by_subject(&self, subject: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
}

/// An upload that decoded cleanly and has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpload {
    pub media_id: String,
    /// Detected from the bytes, not taken from the request
    pub content_type: String,
    pub data: Vec<u8>,
    pub thumbnail: Vec<u8>,
}

/// Media storage contract for handling uploads and thumbnails.
///
/// Writing is split from checking so a submission can reject every bad
/// file before any file of it lands on disk.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Decodes the bytes and builds the thumbnail. Writes nothing.
    /// Undecodable data fails with `AppError::ValidationError`.
    async fn prepare_upload(&self, data: Vec<u8>) -> anyhow::Result<PreparedUpload>;
    /// Writes a prepared upload. Returns `false` when identical content was already stored.
    async fn commit_upload(&self, upload: PreparedUpload) -> anyhow::Result<bool>;
    /// Removes a stored original and its thumbnail.
    async fn discard(&self, media_id: &str) -> anyhow::Result<()>;
    /// Returns the URL or path to the original media.
    fn url(&self, media_id: &str) -> String;
    /// Returns the URL or path to the thumbnail.
    fn thumbnail_url(&self, media_id: &str) -> String;
}

/// Identity contract: turns a bearer token into the account it speaks for.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn verify_bearer(&self, token: &str) -> Result<Identity, AppError>;
}
