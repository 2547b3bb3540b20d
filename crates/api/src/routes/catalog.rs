//! Route definitions for the genre and author catalogs.

use axum::routing::get;
use axum::{Extension, Router};
use bookshelf_core::tags::TagKind;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes for one [`TagKind`], mounted at `/genres` or `/authors`.
///
/// ```text
/// GET    /        -> list_tags
/// GET    /{id}    -> get_tag
/// PUT    /{id}    -> rename_tag
/// PATCH  /{id}    -> rename_tag
/// DELETE /{id}    -> delete_tag
/// ```
pub fn router(kind: TagKind) -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_tags))
        .route(
            "/{id}",
            get(catalog::get_tag)
                .put(catalog::rename_tag)
                .patch(catalog::rename_tag)
                .delete(catalog::delete_tag),
        )
        .layer(Extension(kind))
}
