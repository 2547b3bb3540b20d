//! Handlers for the shared genre and author catalogs.
//!
//! The same handlers serve `/genres` and `/authors`; the router attaches the
//! [`TagKind`] as an [`Extension`]. All endpoints require authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use bookshelf_core::error::CoreError;
use bookshelf_core::tag_name::normalize_tag_name;
use bookshelf_core::tags::TagKind;
use bookshelf_core::types::DbId;
use bookshelf_db::models::tag::UpdateTag;
use bookshelf_db::repositories::TagRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/{genres|authors}
///
/// List every tag of the kind, ordered by name descending.
pub async fn list_tags(
    _auth: AuthUser,
    Extension(kind): Extension<TagKind>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool, kind).await?;

    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/{genres|authors}/{id}
pub async fn get_tag(
    _auth: AuthUser,
    Extension(kind): Extension<TagKind>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))?;

    Ok(Json(DataResponse { data: tag }))
}

/// PUT / PATCH /api/v1/{genres|authors}/{id}
///
/// Rename a tag. The name is normalized; renaming onto another tag's name
/// is a 409.
pub async fn rename_tag(
    auth: AuthUser,
    Extension(kind): Extension<TagKind>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let tag = TagRepo::rename(&state.pool, kind, id, &input.name)
        .await
        .map_err(|err| {
            let collision = err
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if collision {
                AppError::Core(CoreError::Conflict(format!(
                    "{} named '{}' already exists",
                    kind.entity(),
                    normalize_tag_name(&input.name)
                )))
            } else {
                AppError::Database(err)
            }
        })?
        .ok_or_else(|| not_found(kind, id))?;

    tracing::info!(%kind, tag_id = id, user_id = auth.user_id, name = %tag.name, "Tag renamed");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/{genres|authors}/{id}
///
/// Delete a tag. Its book associations go with it; the books stay.
pub async fn delete_tag(
    auth: AuthUser,
    Extension(kind): Extension<TagKind>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TagRepo::delete(&state.pool, kind, id).await? {
        return Err(not_found(kind, id));
    }

    tracing::info!(%kind, tag_id = id, user_id = auth.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn not_found(kind: TagKind, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: kind.entity(),
        id,
    })
}
