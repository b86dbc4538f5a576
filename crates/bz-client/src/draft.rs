//! Draft form state.
//!
//! A `Draft` is created empty when a form opens, changed only through
//! [`Draft::update`], cleared after a successful submission and simply
//! dropped when the form goes away.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use bz_core::validation::{MAX_IMAGES, MAX_TAGS, SHORT_DESCRIPTION_MAX, SHORT_DESCRIPTION_MIN};
use bz_ui::{ListingPreview, PreviewImage};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one staged file. Two stagings of the same bytes are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(u64);

/// A file picked for upload but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    id: ImageId,
    file_name: String,
    content_type: String,
    data: Bytes,
}

impl StagedImage {
    /// Stages in-memory bytes; the content type is guessed from the file name.
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            file_name,
            content_type,
            data: data.into(),
        }
    }

    /// Reads a file from disk and stages it under its base name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, data))
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}

/// One user edit.
#[derive(Debug, Clone)]
pub enum DraftMsg {
    SetTitle(String),
    SetShortDescription(String),
    SetDescription(String),
    SetTagInput(String),
    /// Commit the tag input as a new tag.
    AddTag,
    RemoveTag(String),
    AddImages(Vec<StagedImage>),
    RemoveImage(ImageId),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    title: String,
    short_description: String,
    description: String,
    tags: Vec<String>,
    tag_input: String,
    images: Vec<StagedImage>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one edit. Rejected edits return the draft unchanged.
    pub fn update(mut self, msg: DraftMsg) -> Self {
        match msg {
            DraftMsg::SetTitle(title) => self.title = title,
            DraftMsg::SetShortDescription(text) => {
                self.short_description = text.chars().take(SHORT_DESCRIPTION_MAX).collect();
            }
            DraftMsg::SetDescription(markup) => self.description = markup,
            DraftMsg::SetTagInput(text) => self.tag_input = text,
            DraftMsg::AddTag => {
                if self.can_add_tag() {
                    let tag = self.tag_input.trim().to_string();
                    self.tags.push(tag);
                    self.tag_input.clear();
                }
            }
            DraftMsg::RemoveTag(tag) => self.tags.retain(|t| *t != tag),
            DraftMsg::AddImages(files) => {
                let room = MAX_IMAGES.saturating_sub(self.images.len());
                self.images.extend(files.into_iter().take(room));
            }
            DraftMsg::RemoveImage(id) => self.images.retain(|img| img.id != id),
            DraftMsg::Clear => self = Self::default(),
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Character count shown next to the short description input.
    pub fn short_description_len(&self) -> usize {
        self.short_description.chars().count()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    pub fn images(&self) -> &[StagedImage] {
        &self.images
    }

    /// Whether the "Add" tag button is enabled. Tags travel comma-joined,
    /// so a tag may not contain a comma.
    pub fn can_add_tag(&self) -> bool {
        let tag = self.tag_input.trim();
        !tag.is_empty()
            && !tag.contains(',')
            && self.tags.len() < MAX_TAGS
            && !self.tags.iter().any(|t| t == tag)
    }

    /// Whether the file input is enabled.
    pub fn can_add_images(&self) -> bool {
        self.images.len() < MAX_IMAGES
    }

    /// Every required field is filled in.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && self.short_description_len() >= SHORT_DESCRIPTION_MIN
            && !self.tags.is_empty()
            && !self.images.is_empty()
    }

    pub fn preview(&self) -> ListingPreview<'_> {
        ListingPreview {
            title: &self.title,
            short_description: &self.short_description,
            description: &self.description,
            tags: &self.tags,
            images: self
                .images
                .iter()
                .map(|img| PreviewImage {
                    file_name: img.file_name.clone(),
                    src: img.data_uri(),
                })
                .collect(),
        }
    }
}
