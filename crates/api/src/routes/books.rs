//! Route definitions for books.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::books;
use crate::state::AppState;

/// Book routes mounted at `/books`.
///
/// ```text
/// GET    /                    -> list_books
/// POST   /                    -> create_book
/// GET    /{id}                -> get_book
/// PUT    /{id}                -> replace_book
/// PATCH  /{id}                -> update_book
/// DELETE /{id}                -> delete_book
/// POST   /{id}/upload-image   -> upload_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route(
            "/{id}",
            get(books::get_book)
                .put(books::replace_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        .route("/{id}/upload-image", post(books::upload_image))
}
