//! Handlers for the `/books` resource.
//!
//! Every endpoint requires authentication via [`AuthUser`]. A book owned by
//! another user is reported as not found, exactly like a missing one.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bookshelf_core::access::authorize;
use bookshelf_core::error::CoreError;
use bookshelf_core::filter::BookFilter;
use bookshelf_core::images::{image_storage_key, inspect_image, IMAGE_FIELD};
use bookshelf_core::types::DbId;
use bookshelf_db::models::book::{
    Book, BookDetail, BookImage, BookPayload, BookSummary, BookWithTags, UpdateBook,
};
use bookshelf_db::repositories::BookRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiMultipart, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::query::BookListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Book";

/// GET /api/v1/books
///
/// List the caller's books, newest first, optionally filtered by
/// `?genres=A,B` and/or `?authors=C`.
pub async fn list_books(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = BookFilter::from_params(params.genres.as_deref(), params.authors.as_deref());
    let books = BookRepo::list_for_owner(&state.pool, auth.actor().scope(), &filter).await?;

    let data: Vec<BookSummary> = books.into_iter().map(BookWithTags::into_summary).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/books
///
/// Create a book owned by the caller. Returns 201 with the detail view.
pub async fn create_book(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<impl IntoResponse> {
    let input = payload.into_create()?;
    let book = BookRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(book_id = book.book.id, user_id = auth.user_id, "Book created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: book.into_detail(),
        }),
    ))
}

/// GET /api/v1/books/{id}
pub async fn get_book(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = load_owned(&state, &auth, id).await?;
    let book = BookRepo::with_tags(&state.pool, book).await?;

    Ok(Json(DataResponse {
        data: book.into_detail(),
    }))
}

/// PUT /api/v1/books/{id}
///
/// Full replacement: `title`, `price` and `link` are required. Genre and
/// author lists are only replaced when present.
pub async fn replace_book(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &auth, id).await?;
    let input = UpdateBook::from(payload.into_create()?);

    apply_update(&state, &auth, id, &input).await
}

/// PATCH /api/v1/books/{id}
///
/// Partial update: only the fields present in the body change.
pub async fn update_book(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &auth, id).await?;
    let input = payload.into_update()?;

    apply_update(&state, &auth, id, &input).await
}

/// DELETE /api/v1/books/{id}
///
/// Remove the book and its associations. Genres and authors stay.
pub async fn delete_book(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &auth, id).await?;

    if !BookRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(book_id = id, user_id = auth.user_id, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/books/{id}/upload-image
///
/// Accepts a multipart body with an `image` file field. The file must be a
/// PNG, JPEG, GIF or WebP image; it is stored under the media root and the
/// book's `image` column points at it.
pub async fn upload_image(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &auth, id).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        upload.ok_or_else(|| CoreError::field(IMAGE_FIELD, "No file was submitted."))?;
    let info = inspect_image(&data)?;

    let key = image_storage_key(&filename);
    state.storage.save(&key, &data).await?;

    let Some(book) = BookRepo::set_image(&state.pool, id, &key).await? else {
        state.storage.remove(&key).await?;
        return Err(not_found(id));
    };

    tracing::info!(
        book_id = id,
        user_id = auth.user_id,
        image = %key,
        format = ?info.format,
        width = info.width,
        height = info.height,
        "Book image uploaded",
    );

    Ok(Json(DataResponse {
        data: BookImage::from(book),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a book and check the caller owns it.
async fn load_owned(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Book> {
    let book = BookRepo::find_by_id(&state.pool, id).await?;
    Ok(authorize(&auth.actor(), book, ENTITY, id)?)
}

async fn apply_update(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    input: &UpdateBook,
) -> AppResult<Json<DataResponse<BookDetail>>> {
    let book = BookRepo::update(&state.pool, id, input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(book_id = id, user_id = auth.user_id, "Book updated");

    Ok(Json(DataResponse {
        data: book.into_detail(),
    }))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}
