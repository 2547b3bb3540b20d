pub mod books;
pub mod catalog;
pub mod health;

use axum::Router;
use bookshelf_core::tags::TagKind;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /books                         list, create
/// /books/{id}                    get, replace, update, delete
/// /books/{id}/upload-image       upload cover image (POST, multipart)
///
/// /genres                        list
/// /genres/{id}                   get, rename (PUT/PATCH), delete
///
/// /authors                       list
/// /authors/{id}                  get, rename (PUT/PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/books", books::router())
        .nest("/genres", catalog::router(TagKind::Genre))
        .nest("/authors", catalog::router(TagKind::Author))
}
