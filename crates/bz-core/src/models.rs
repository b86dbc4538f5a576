//! # Domain Models
//!
//! These structs represent the core entities of bazaar.
//! Records use UUID v7 for time-ordered, globally unique identification and
//! serialize with camelCase keys, which is what the browser client speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two kinds of listing the marketplace publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// A product offered by a seller.
    Item,
    /// A course lesson or blog article.
    Course,
}

impl ListingKind {
    /// Name of the document collection holding this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Course => "courses",
        }
    }

    /// Category stored when the submission does not name one.
    pub fn default_category(self) -> &'static str {
        match self {
            Self::Item => "general",
            Self::Course => "lesson",
        }
    }

    /// Path of the multipart create endpoint.
    pub fn create_path(self) -> &'static str {
        match self {
            Self::Item => "/item/create",
            Self::Course => "/lesson/create",
        }
    }

    /// Path of the listing endpoint.
    pub fn list_path(self) -> &'static str {
        match self {
            Self::Item => "/items",
            Self::Course => "/courses",
        }
    }
}

/// A registered account, keyed by the subject of its bearer tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Stable identifier issued by the auth provider (`sub` claim)
    pub subject: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A stored upload attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    /// Content hash returned by the MediaStore
    pub id: String,
    pub url: String,
    pub thumbnail_url: String,
    pub content_type: String,
}

/// Price and stock for sellable items. Courses carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub price: f64,
    pub quantity: u32,
    pub in_stock: bool,
}

/// A published item or course/blog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub kind: ListingKind,
    /// Subject of the account that created the listing
    pub owner: String,
    /// Display name sent along with the submission
    pub username: String,
    pub title: String,
    pub short_description: String,
    /// Rich-text markup produced by the editor
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub images: Vec<MediaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Query parameters accepted by the listing routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| listing.category == c);
        let tag_ok = self.tag.as_deref().map_or(true, |t| listing.has_tag(t));
        category_ok && tag_ok
    }
}

/// Who a verified bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub username: Option<String>,
}
