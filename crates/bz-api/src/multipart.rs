//! Reads a create-listing multipart body into a `ListingForm`.

use axum::extract::Multipart;
use bz_core::validation::{ListingForm, UploadedImage};

use crate::error::ApiError;

/// Collects the known parts. `image` may repeat; unknown parts are skipped.
pub async fn read_listing_form(mut multipart: Multipart) -> Result<ListingForm, ApiError> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field
                    .content_type()
                    .map(str::to_owned)
                    .or_else(|| {
                        file_name.as_deref().and_then(|f| {
                            mime_guess::from_path(f).first().map(|m| m.essence_str().to_owned())
                        })
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await?;
                // An untouched file input still posts an empty part.
                if data.is_empty() {
                    continue;
                }
                form.images.push(UploadedImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "title" => form.title = Some(field.text().await?),
            "username" => form.username = Some(field.text().await?),
            "shortDescription" => form.short_description = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "tags" => form.tags = Some(field.text().await?),
            "category" => form.category = Some(field.text().await?),
            "price" => form.price = Some(field.text().await?),
            "quantity" => form.quantity = Some(field.text().await?),
            "inStock" => form.in_stock = Some(field.text().await?),
            other => tracing::debug!(part = other, "ignoring unknown multipart part"),
        }
    }

    Ok(form)
}
