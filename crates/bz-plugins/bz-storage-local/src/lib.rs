//! # bz-storage-local
//!
//! Local filesystem implementation of `MediaStore`.
//! Features: Content-addressable storage, directory sharding, and thumbnailing.

use async_trait::async_trait;
use bz_core::error::AppError;
use bz_core::traits::{MediaStore, PreparedUpload};
use image::{DynamicImage, ImageFormat, ImageReader};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::PathBuf;
use tokio::fs;

/// Longest edge of generated thumbnails, in pixels.
const THUMBNAIL_EDGE: u32 = 250;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/uploads")
    url_prefix: String,
}

/// Splits a media id into its two shard directory names and its hash.
fn shard(media_id: &str) -> (&str, &str, &str) {
    let hash = media_id.split('.').next().unwrap_or(media_id);
    (
        hash.get(0..2).unwrap_or("00"),
        hash.get(2..4).unwrap_or("00"),
        hash,
    )
}

/// Decodes the upload and encodes its WebP thumbnail. Returns the detected
/// format alongside the thumbnail bytes.
fn decode_and_thumbnail(data: &[u8]) -> anyhow::Result<(ImageFormat, Vec<u8>)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| AppError::validation("upload is not a recognised image format"))?;
    let img = reader
        .decode()
        .map_err(|e| AppError::validation(format!("upload could not be decoded: {e}")))?;

    // The WebP encoder only takes 8-bit RGB(A).
    let thumb = DynamicImage::ImageRgba8(img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8());
    let mut thumbnail = Vec::new();
    thumb.write_to(&mut Cursor::new(&mut thumbnail), ImageFormat::WebP)?;

    Ok((format, thumbnail))
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Generates a sharded directory: "<root>/ab/cd"
    fn shard_dir(&self, media_id: &str) -> PathBuf {
        let (a, b, _) = shard(media_id);
        self.root_path.join(a).join(b)
    }

    fn thumbnail_path(&self, media_id: &str) -> PathBuf {
        let (_, _, hash) = shard(media_id);
        self.shard_dir(media_id).join(format!("thumb_{hash}.webp"))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    /// Names the upload by its SHA-256 hash, which deduplicates files.
    async fn prepare_upload(&self, data: Vec<u8>) -> anyhow::Result<PreparedUpload> {
        let hash = format!("{:x}", Sha256::digest(&data));

        // Decode off the async runtime; undecodable uploads are rejected here
        let (data, decoded) = tokio::task::spawn_blocking(move || {
            let decoded = decode_and_thumbnail(&data);
            (data, decoded)
        })
        .await?;
        let (format, thumbnail) = decoded?;

        let extension = format.extensions_str().first().copied().unwrap_or("bin");
        Ok(PreparedUpload {
            media_id: format!("{hash}.{extension}"),
            content_type: format.to_mime_type().to_string(),
            data,
            thumbnail,
        })
    }

    async fn commit_upload(&self, upload: PreparedUpload) -> anyhow::Result<bool> {
        let dir = self.shard_dir(&upload.media_id);
        fs::create_dir_all(&dir).await?;

        let target = dir.join(&upload.media_id);
        if fs::try_exists(&target).await? {
            tracing::debug!(media_id = %upload.media_id, "upload already stored");
            return Ok(false);
        }
        fs::write(self.thumbnail_path(&upload.media_id), &upload.thumbnail).await?;
        fs::write(&target, &upload.data).await?;
        tracing::info!(
            media_id = %upload.media_id,
            content_type = %upload.content_type,
            bytes = upload.data.len(),
            "stored upload"
        );
        Ok(true)
    }

    async fn discard(&self, media_id: &str) -> anyhow::Result<()> {
        for path in [self.shard_dir(media_id).join(media_id), self.thumbnail_path(media_id)] {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::info!(media_id, "discarded upload");
        Ok(())
    }

    fn url(&self, media_id: &str) -> String {
        let (a, b, _) = shard(media_id);
        format!("{}/{a}/{b}/{media_id}", self.url_prefix)
    }

    fn thumbnail_url(&self, media_id: &str) -> String {
        let (a, b, hash) = shard(media_id);
        format!("{}/{a}/{b}/thumb_{hash}.webp", self.url_prefix)
    }
}
