mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bz_core::models::User;
use chrono::Utc;
use common::*;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn user(subject: &str, username: &str) -> User {
    User {
        id: Uuid::now_v7(),
        subject: subject.into(),
        username: username.into(),
        email: format!("{username}@example.com"),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn register_creates_new_account() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_user_by_username().returning(|_| Ok(None));
    mocks.users.expect_find_user_by_subject().returning(|_| Ok(None));
    mocks
        .users
        .expect_save_user()
        .withf(|u| u.subject == "user_1" && u.username == "ada")
        .times(1)
        .returning(|_| Ok(()));

    let response = mocks
        .app()
        .oneshot(json_request(
            "POST",
            "/users",
            Some(GOOD_TOKEN),
            json!({ "username": "ada", "email": "ada@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["subject"], "user_1");
    assert_eq!(body["email"], "ada@example.com");
}

#[tokio::test]
async fn register_again_updates_in_place() {
    let existing = user("user_1", "ada");
    let id = existing.id;
    let mut mocks = Mocks::new();
    let same = existing.clone();
    mocks
        .users
        .expect_find_user_by_username()
        .returning(move |_| Ok(Some(same.clone())));
    mocks
        .users
        .expect_find_user_by_subject()
        .returning(move |_| Ok(Some(existing.clone())));
    mocks
        .users
        .expect_save_user()
        .withf(move |u| u.id == id && u.email == "new@example.com")
        .times(1)
        .returning(|_| Ok(()));

    let response = mocks
        .app()
        .oneshot(json_request(
            "POST",
            "/users",
            Some(GOOD_TOKEN),
            json!({ "username": "ada", "email": "new@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn username_owned_by_someone_else_conflicts() {
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_user_by_username()
        .returning(|_| Ok(Some(user("user_2", "ada"))));

    let response = mocks
        .app()
        .oneshot(json_request(
            "POST",
            "/users",
            Some(GOOD_TOKEN),
            json!({ "username": "ada", "email": "ada@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_email_is_rejected_before_lookup() {
    let response = Mocks::new()
        .app()
        .oneshot(json_request(
            "POST",
            "/users",
            Some(GOOD_TOKEN),
            json!({ "username": "ada", "email": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_get() {
    let ada = user("user_1", "ada");
    let id = ada.id;
    let mut mocks = Mocks::new();
    let all = vec![ada.clone(), user("user_2", "bob")];
    mocks
        .users
        .expect_list_users()
        .returning(move || Ok(all.clone()));
    mocks
        .users
        .expect_get_user()
        .returning(move |wanted| Ok((wanted == id).then(|| ada.clone())));
    let app = mocks.app();

    let listed = app
        .clone()
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(listed).await.as_array().unwrap().len(), 2);

    let found = app
        .clone()
        .oneshot(Request::get(format!("/users/{id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(found).await["username"], "ada");

    let missing = app
        .oneshot(
            Request::get(format!("/users/{}", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
