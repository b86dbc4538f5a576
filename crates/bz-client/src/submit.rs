//! HTTP side of the client: multipart create requests and listing fetches.

use bz_core::models::{Listing, ListingFilter, ListingKind};
use reqwest::multipart::{Form, Part};

use crate::draft::{Draft, StagedImage};
use crate::error::ClientError;

/// Everything one create request sends, snapshotted from a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub title: String,
    pub username: String,
    pub short_description: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub images: Vec<StagedImage>,
}

impl SubmissionPayload {
    pub fn from_draft(draft: &Draft, username: &str, category: &str) -> Self {
        Self {
            title: draft.title().to_string(),
            username: username.to_string(),
            short_description: draft.short_description().to_string(),
            description: draft.description().to_string(),
            tags: draft.tags().to_vec(),
            category: category.to_string(),
            images: draft.images().to_vec(),
        }
    }

    /// One named part per field; each image is its own `image` part.
    pub fn to_form(&self) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("title", self.title.clone())
            .text("username", self.username.clone())
            .text("shortDescription", self.short_description.clone())
            .text("description", self.description.clone())
            .text("tags", self.tags.join(","))
            .text("category", self.category.clone());

        for image in &self.images {
            let part = Part::bytes(image.data().to_vec())
                .file_name(image.file_name().to_string())
                .mime_str(image.content_type())?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends one create request. Any non-2xx answer is an error.
    pub async fn create(
        &self,
        kind: ListingKind,
        payload: &SubmissionPayload,
        token: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint(kind.create_path()))
            .bearer_auth(token)
            .multipart(payload.to_form()?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        tracing::debug!(status = status.as_u16(), kind = kind.collection(), "listing submitted");
        Ok(())
    }

    /// Fetches the published listings of one kind, newest first.
    pub async fn list(
        &self,
        kind: ListingKind,
        filter: &ListingFilter,
    ) -> Result<Vec<Listing>, ClientError> {
        let response = self
            .http
            .get(self.endpoint(kind.list_path()))
            .query(filter)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}
