//! Item and course (blog/lesson) routes.
//!
//! Both kinds share one ingestion path: multipart body -> validation ->
//! media check -> media write -> document insert. A failed submission
//! leaves none of its files behind.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bz_core::error::AppError;
use bz_core::models::{Identity, Listing, ListingFilter, ListingKind, MediaRef};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::multipart::read_listing_form;
use crate::state::SharedState;

/// Removes uploads this request wrote. Content already stored by an earlier
/// listing was never in `written`, so it stays.
async fn discard_all(state: &SharedState, written: &[String]) {
    for media_id in written {
        if let Err(e) = state.store.discard(media_id).await {
            tracing::warn!(media_id = %media_id, error = %e, "failed to discard upload");
        }
    }
}

async fn create(
    state: &SharedState,
    identity: Identity,
    kind: ListingKind,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    let mut form = read_listing_form(multipart).await?;
    if form.username.as_deref().map_or(true, |u| u.trim().is_empty()) {
        form.username = identity.username.clone();
    }
    let (new_listing, images) = form.validate(kind)?;

    // Every image must decode before any of them is written.
    let mut prepared = Vec::with_capacity(images.len());
    for image in images {
        prepared.push(state.store.prepare_upload(image.data).await?);
    }

    let mut written = Vec::new();
    let mut media = Vec::with_capacity(prepared.len());
    for upload in prepared {
        let id = upload.media_id.clone();
        let content_type = upload.content_type.clone();
        match state.store.commit_upload(upload).await {
            Ok(true) => written.push(id.clone()),
            Ok(false) => {}
            Err(e) => {
                discard_all(state, &written).await;
                return Err(e.into());
            }
        }
        media.push(MediaRef {
            url: state.store.url(&id),
            thumbnail_url: state.store.thumbnail_url(&id),
            id,
            content_type,
        });
    }

    let listing = new_listing.into_listing(identity.subject, media, Utc::now());
    if let Err(e) = state.listings.create_listing(listing.clone()).await {
        discard_all(state, &written).await;
        return Err(e.into());
    }

    tracing::info!(
        id = %listing.id,
        kind = kind.collection(),
        owner = %listing.owner,
        images = listing.images.len(),
        "listing created"
    );
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn fetch(state: &SharedState, kind: ListingKind, id: Uuid) -> Result<Json<Listing>, ApiError> {
    state
        .listings
        .get_listing(kind, id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            let label = match kind {
                ListingKind::Item => "Item",
                ListingKind::Course => "Course",
            };
            AppError::NotFound(label.to_string(), id.to_string()).into()
        })
}

pub async fn create_item(
    State(state): State<SharedState>,
    AuthUser(identity): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    create(&state, identity, ListingKind::Item, multipart).await
}

pub async fn list_items(
    State(state): State<SharedState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    Ok(Json(state.listings.list_listings(ListingKind::Item, filter).await?))
}

pub async fn get_item(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, ApiError> {
    fetch(&state, ListingKind::Item, id).await
}

pub async fn create_course(
    State(state): State<SharedState>,
    AuthUser(identity): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    create(&state, identity, ListingKind::Course, multipart).await
}

pub async fn list_courses(
    State(state): State<SharedState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    Ok(Json(state.listings.list_listings(ListingKind::Course, filter).await?))
}

pub async fn get_course(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, ApiError> {
    fetch(&state, ListingKind::Course, id).await
}
