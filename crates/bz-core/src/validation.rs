//! # Submission Validation
//!
//! The server trusts only these checks; the client runs its own.

use crate::error::{AppError, Result};
use crate::models::{Listing, ListingKind, MediaRef, Pricing};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const MAX_TAGS: usize = 4;
pub const MAX_IMAGES: usize = 3;
pub const SHORT_DESCRIPTION_MIN: usize = 50;
pub const SHORT_DESCRIPTION_MAX: usize = 150;

/// One file part of a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Raw text parts of a create-listing submission, as received.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub title: Option<String>,
    pub username: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    /// Comma-joined tag list
    pub tags: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub in_stock: Option<String>,
    pub images: Vec<UploadedImage>,
}

/// A submission that passed validation and only waits for its images to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub kind: ListingKind,
    pub username: String,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub pricing: Option<Pricing>,
}

impl NewListing {
    pub fn into_listing(self, owner: String, images: Vec<MediaRef>, now: DateTime<Utc>) -> Listing {
        Listing {
            id: Uuid::now_v7(),
            kind: self.kind,
            owner,
            username: self.username,
            title: self.title,
            short_description: self.short_description,
            description: self.description,
            tags: self.tags,
            category: self.category,
            images,
            pricing: self.pricing,
            created_at: now,
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits the comma-joined `tags` part, keeping first-seen order.
pub fn parse_tags(raw: &str) -> Result<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if tags.iter().any(|t| t == tag) {
            return Err(AppError::validation(format!("duplicate tag '{tag}'")));
        }
        tags.push(tag.to_string());
    }
    if tags.is_empty() {
        return Err(AppError::validation("at least one tag is required"));
    }
    if tags.len() > MAX_TAGS {
        return Err(AppError::validation(format!("at most {MAX_TAGS} tags are allowed")));
    }
    Ok(tags)
}

fn parse_pricing(form: &ListingForm) -> Result<Option<Pricing>> {
    let Some(raw_price) = optional(form.price.clone()) else {
        return Ok(None);
    };
    let price: f64 = raw_price
        .parse()
        .map_err(|_| AppError::validation(format!("price '{raw_price}' is not a number")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation("price must be zero or more"));
    }
    let quantity = match optional(form.quantity.clone()) {
        Some(q) => q
            .parse()
            .map_err(|_| AppError::validation(format!("quantity '{q}' is not a whole number")))?,
        None => 0,
    };
    let in_stock = match optional(form.in_stock.clone()).as_deref() {
        Some("true") | Some("on") | Some("1") => true,
        Some("false") | Some("off") | Some("0") => false,
        Some(other) => {
            return Err(AppError::validation(format!("inStock '{other}' is not a boolean")))
        }
        None => quantity > 0,
    };
    Ok(Some(Pricing {
        price,
        quantity,
        in_stock,
    }))
}

impl ListingForm {
    /// Checks every field and splits the images off for storage.
    pub fn validate(self, kind: ListingKind) -> Result<(NewListing, Vec<UploadedImage>)> {
        let pricing = match kind {
            ListingKind::Item => parse_pricing(&self)?,
            ListingKind::Course => None,
        };

        let title = required(self.title, "title")?;
        let description = required(self.description, "description")?;
        let short_description = required(self.short_description, "shortDescription")?;
        let len = short_description.chars().count();
        if !(SHORT_DESCRIPTION_MIN..=SHORT_DESCRIPTION_MAX).contains(&len) {
            return Err(AppError::validation(format!(
                "shortDescription must be between {SHORT_DESCRIPTION_MIN} and {SHORT_DESCRIPTION_MAX} characters, got {len}"
            )));
        }

        let tags = parse_tags(self.tags.as_deref().unwrap_or_default())?;

        if self.images.is_empty() {
            return Err(AppError::validation("at least one image is required"));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(AppError::validation(format!(
                "at most {MAX_IMAGES} images are allowed"
            )));
        }
        if let Some(bad) = self
            .images
            .iter()
            .find(|img| !img.content_type.starts_with("image/"))
        {
            return Err(AppError::validation(format!(
                "unsupported file type '{}'",
                bad.content_type
            )));
        }

        let listing = NewListing {
            kind,
            username: optional(self.username).unwrap_or_else(|| "anonymous".to_string()),
            title,
            short_description,
            description,
            tags,
            category: optional(self.category)
                .unwrap_or_else(|| kind.default_category().to_string()),
            pricing,
        };
        Ok((listing, self.images))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> UploadedImage {
        UploadedImage {
            file_name: Some("a.png".into()),
            content_type: "image/png".into(),
            data: vec![1, 2, 3],
        }
    }

    fn form() -> ListingForm {
        ListingForm {
            title: Some("A".into()),
            username: Some("username".into()),
            short_description: Some("x".repeat(50)),
            description: Some("<p>x</p>".into()),
            tags: Some("go".into()),
            category: None,
            images: vec![png()],
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_course() {
        let (listing, images) = form().validate(ListingKind::Course).unwrap();
        assert_eq!(listing.title, "A");
        assert_eq!(listing.tags, vec!["go"]);
        assert_eq!(listing.category, "lesson");
        assert!(listing.pricing.is_none());
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn rejects_short_description_out_of_bounds() {
        let mut f = form();
        f.short_description = Some("x".repeat(49));
        assert!(matches!(
            f.validate(ListingKind::Course),
            Err(AppError::ValidationError(_))
        ));

        let mut f = form();
        f.short_description = Some("x".repeat(151));
        assert!(f.validate(ListingKind::Course).is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut f = form();
        f.short_description = Some("é".repeat(150));
        assert!(f.validate(ListingKind::Course).is_ok());
    }

    #[test]
    fn tag_rules() {
        assert_eq!(parse_tags("rust, go ,,web").unwrap(), vec!["rust", "go", "web"]);
        assert!(parse_tags("a,b,c,d,e").is_err());
        assert!(parse_tags("a,a").is_err());
        assert!(parse_tags(" , ").is_err());
    }

    #[test]
    fn image_rules() {
        let mut f = form();
        f.images.clear();
        assert!(f.validate(ListingKind::Course).is_err());

        let mut f = form();
        f.images = vec![png(), png(), png(), png()];
        assert!(f.validate(ListingKind::Course).is_err());

        let mut f = form();
        f.images[0].content_type = "application/pdf".into();
        let err = f.validate(ListingKind::Course).unwrap_err();
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn item_pricing() {
        let mut f = form();
        f.price = Some("12.50".into());
        f.quantity = Some("3".into());
        let (listing, _) = f.validate(ListingKind::Item).unwrap();
        assert_eq!(listing.category, "general");
        assert_eq!(
            listing.pricing,
            Some(Pricing {
                price: 12.5,
                quantity: 3,
                in_stock: true
            })
        );

        let mut f = form();
        f.price = Some("-1".into());
        assert!(f.validate(ListingKind::Item).is_err());
    }

    #[test]
    fn courses_ignore_pricing_parts() {
        let mut f = form();
        f.price = Some("not a number".into());
        let (listing, _) = f.validate(ListingKind::Course).unwrap();
        assert!(listing.pricing.is_none());
    }
}
