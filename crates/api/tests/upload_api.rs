//! Integration tests for `POST /books/{id}/upload-image` and `/media`.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get, png_bytes, post_json_auth, post_multipart_auth, token_for};
use serde_json::json;
use sqlx::PgPool;

async fn seed_book(app: axum::Router, token: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/books",
        token,
        json!({ "title": "Covered", "price": "3.50", "link": "https://example.com/c.pdf" }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_stores_image_and_serves_it(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let token = token_for(create_user(&pool, "reader@example.com").await);
    let app = || common::build_test_app_with_media(pool.clone(), media.path());

    let id = seed_book(app(), &token).await;
    let png = png_bytes();

    let response = post_multipart_auth(
        app(),
        &format!("/api/v1/books/{id}/upload-image"),
        &token,
        "image",
        "cover.png",
        &png,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    let key = json["data"]["image"].as_str().unwrap().to_string();
    assert!(key.starts_with("uploads/book/"));
    assert!(key.ends_with(".png"));
    assert_eq!(std::fs::read(media.path().join(&key)).unwrap(), png);

    let response = get(app(), &format!("/media/{key}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_rejects_non_image(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let token = token_for(create_user(&pool, "reader@example.com").await);
    let app = || common::build_test_app_with_media(pool.clone(), media.path());

    let id = seed_book(app(), &token).await;
    let response = post_multipart_auth(
        app(),
        &format!("/api/v1/books/{id}/upload-image"),
        &token,
        "image",
        "cover.png",
        b"notimage",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["image"][0]
        .as_str()
        .unwrap()
        .starts_with("Upload a valid image."));
    assert!(!media.path().join("uploads").exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_rejects_truncated_image(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let token = token_for(create_user(&pool, "reader@example.com").await);
    let app = || common::build_test_app_with_media(pool.clone(), media.path());

    let id = seed_book(app(), &token).await;
    let png = png_bytes();
    let response = post_multipart_auth(
        app(),
        &format!("/api/v1/books/{id}/upload-image"),
        &token,
        "image",
        "cover.png",
        &png[..png.len() / 2],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(!media.path().join("uploads").exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_to_foreign_book_returns_404(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let alice = token_for(create_user(&pool, "alice@example.com").await);
    let bob = token_for(create_user(&pool, "bob@example.com").await);
    let app = || common::build_test_app_with_media(pool.clone(), media.path());

    let id = seed_book(app(), &alice).await;
    let response = post_multipart_auth(
        app(),
        &format!("/api/v1/books/{id}/upload-image"),
        &bob,
        "image",
        "cover.png",
        &png_bytes(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_without_image_field_is_rejected(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let token = token_for(create_user(&pool, "reader@example.com").await);
    let app = || common::build_test_app_with_media(pool.clone(), media.path());

    let id = seed_book(app(), &token).await;
    let response = post_multipart_auth(
        app(),
        &format!("/api/v1/books/{id}/upload-image"),
        &token,
        "file",
        "cover.png",
        &png_bytes(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["image"][0],
        "No file was submitted."
    );
}
