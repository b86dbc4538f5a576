#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use bz_api::{router, ApiOptions, AppState};
use bz_core::error::AppError;
use bz_core::models::Identity;
use bz_core::traits::{
    MediaStore, MockAuthProvider, MockListingRepo, MockMediaStore, MockUserRepo, PreparedUpload,
};

pub const BOUNDARY: &str = "----bazaar-test-boundary";
pub const GOOD_TOKEN: &str = "good-token";

/// Mocks for every port; tests set expectations before calling `app`.
pub struct Mocks {
    pub listings: MockListingRepo,
    pub users: MockUserRepo,
    pub store: MockMediaStore,
    pub auth: MockAuthProvider,
}

impl Mocks {
    pub fn new() -> Self {
        let mut auth = MockAuthProvider::new();
        auth.expect_verify_bearer().returning(|token| {
            if token == GOOD_TOKEN {
                Ok(Identity {
                    subject: "user_1".into(),
                    username: Some("ada".into()),
                })
            } else {
                Err(AppError::Unauthorized("invalid or expired token".into()))
            }
        });
        Self {
            listings: MockListingRepo::new(),
            users: MockUserRepo::new(),
            store: MockMediaStore::new(),
            auth,
        }
    }

    /// A media store that accepts anything and hands back predictable ids.
    /// Every upload is reported as detected PNG content.
    pub fn accept_uploads(&mut self) {
        let mut n = 0;
        self.store.expect_prepare_upload().returning(move |data| {
            n += 1;
            Ok(PreparedUpload {
                media_id: format!("hash{n}.png"),
                content_type: "image/png".into(),
                data,
                thumbnail: vec![],
            })
        });
        self.store.expect_commit_upload().returning(|_| Ok(true));
        self.store
            .expect_url()
            .returning(|id| format!("/uploads/{id}"));
        self.store
            .expect_thumbnail_url()
            .returning(|id| format!("/uploads/thumb_{id}"));
    }

    pub fn app(self) -> Router {
        let Mocks {
            listings,
            users,
            store,
            auth,
        } = self;
        build(listings, users, Box::new(store), auth)
    }

    /// Same router, but with a real media store in place of the mock.
    pub fn app_with_store(self, store: Box<dyn MediaStore>) -> Router {
        build(self.listings, self.users, store, self.auth)
    }
}

fn build(
    listings: MockListingRepo,
    users: MockUserRepo,
    store: Box<dyn MediaStore>,
    auth: MockAuthProvider,
) -> Router {
    let state = Arc::new(AppState {
        listings: Box::new(listings),
        users: Box::new(users),
        store,
        auth: Box::new(auth),
    });
    router(
        state,
        &ApiOptions {
            media_root: None,
            media_url_prefix: "/uploads".into(),
            max_upload_bytes: 1024 * 1024,
        },
    )
}

/// Encodes a small solid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 200, 10]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Every regular file below `root`.
pub fn files_under(root: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                found.push(path);
            }
        }
    }
    found
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, content_type, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, json: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(json.to_string())).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The parts a valid blog submission carries.
pub fn blog_parts<'a>(short_description: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("title", "A"),
        Part::Text("username", "username"),
        Part::Text("shortDescription", short_description),
        Part::Text("description", "<p>x</p>"),
        Part::Text("tags", "go,rust"),
        Part::Text("category", "lesson"),
        Part::File("image", "cover.png", "image/png", b"\x89PNG fake"),
    ]
}
