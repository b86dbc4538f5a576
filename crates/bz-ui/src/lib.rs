//! # bz-ui
//!
//! Askama views for the browser client: the live preview next to the
//! authoring form and the listing index.

pub use askama::Template;
use bz_core::models::Listing;

/// A staged image as the preview shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub file_name: String,
    /// `data:` URI built from the staged bytes; inserted unescaped
    pub src: String,
}

/// Read-only projection of a draft. Everything is escaped except the
/// description, which is already markup from the rich-text editor.
#[derive(Template)]
#[template(path = "preview.html")]
pub struct ListingPreview<'a> {
    pub title: &'a str,
    pub short_description: &'a str,
    pub description: &'a str,
    pub tags: &'a [String],
    pub images: Vec<PreviewImage>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct ListingIndex<'a> {
    pub heading: &'a str,
    /// Path the cards link under, e.g. "/items"
    pub listing_base: &'a str,
    pub listings: &'a [Listing],
}
