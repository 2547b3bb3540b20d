//! Repository for the `books` table and its genre/author associations.
//!
//! Writes run in one transaction: the book row first, then the genre and
//! author synchronization through [`PgTagStore`].

use bookshelf_core::access::OwnerScope;
use bookshelf_core::filter::BookFilter;
use bookshelf_core::sync::sync_book_tags;
use bookshelf_core::tags::TagKind;
use bookshelf_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::book::{Book, BookWithTags, CreateBook, UpdateBook};
use crate::repositories::{PgTagStore, TagRepo};

/// Column list for the `books` table.
const COLUMNS: &str = "id, owner_id, title, description, price, link, image, \
    created_at, updated_at";

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a book owned by `owner_id` and link the requested tags.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateBook,
    ) -> Result<BookWithTags, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO books (owner_id, title, description, price, link) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.link)
            .fetch_one(&mut *tx)
            .await?;

        Self::sync_tags(&mut *tx, book.id, input.genres.as_deref(), input.authors.as_deref())
            .await?;

        tx.commit().await?;
        Self::with_tags(pool, book).await
    }

    /// Find a book by its ID, regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the books in `scope` that pass `filter`, newest first.
    ///
    /// Each active filter becomes an `EXISTS` subquery, so a book matching
    /// several requested names still appears once.
    pub async fn list_for_owner(
        pool: &PgPool,
        scope: OwnerScope,
        filter: &BookFilter,
    ) -> Result<Vec<BookWithTags>, sqlx::Error> {
        let tag_conditions: String = TagKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let param = i + 2;
                format!(
                    " AND (${param}::text[] IS NULL OR EXISTS (\
                         SELECT 1 FROM {link_table} l \
                         JOIN {table} t ON t.id = l.{link_column} \
                         WHERE l.book_id = b.id AND t.name = ANY(${param})))",
                    link_table = kind.link_table(),
                    table = kind.table(),
                    link_column = kind.link_column(),
                )
            })
            .collect();

        let query = format!(
            "SELECT {COLUMNS} FROM books b \
             WHERE b.owner_id = $1{tag_conditions} \
             ORDER BY b.id DESC"
        );
        let mut q = sqlx::query_as::<_, Book>(&query).bind(scope.owner_id);
        for kind in TagKind::ALL {
            q = q.bind(filter.names(kind));
        }
        let books = q.fetch_all(pool).await?;

        Self::attach_tags(pool, books).await
    }

    /// Update a book. Only `Some` fields are applied; tag lists that are
    /// `Some` replace the current associations.
    ///
    /// Returns `None` if no book with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<BookWithTags>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE books SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                price = COALESCE($4, price), \
                link = COALESCE($5, link) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.price)
            .bind(input.link.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(book) = book else {
            return Ok(None);
        };

        Self::sync_tags(&mut *tx, book.id, input.genres.as_deref(), input.authors.as_deref())
            .await?;

        tx.commit().await?;
        Self::with_tags(pool, book).await.map(Some)
    }

    /// Point the book's `image` column at a stored upload.
    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        image_key: &str,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("UPDATE books SET image = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(image_key)
            .fetch_optional(pool)
            .await
    }

    /// Delete a book. Its association rows cascade; genres and authors stay.
    ///
    /// Returns `true` if a book was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the genres and authors of a single book.
    pub async fn with_tags(pool: &PgPool, book: Book) -> Result<BookWithTags, sqlx::Error> {
        let mut loaded = Self::attach_tags(pool, vec![book]).await?;
        loaded.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Load the genres and authors of many books with one query per kind,
    /// keeping the input order.
    pub async fn attach_tags(
        pool: &PgPool,
        books: Vec<Book>,
    ) -> Result<Vec<BookWithTags>, sqlx::Error> {
        let ids: Vec<DbId> = books.iter().map(|b| b.id).collect();
        let mut genres = TagRepo::tags_for_books(pool, TagKind::Genre, &ids).await?;
        let mut authors = TagRepo::tags_for_books(pool, TagKind::Author, &ids).await?;

        Ok(books
            .into_iter()
            .map(|book| BookWithTags {
                genres: genres.remove(&book.id).unwrap_or_default(),
                authors: authors.remove(&book.id).unwrap_or_default(),
                book,
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn sync_tags(
        conn: &mut PgConnection,
        book_id: DbId,
        genres: Option<&[String]>,
        authors: Option<&[String]>,
    ) -> Result<(), sqlx::Error> {
        let mut store = PgTagStore::new(conn);
        for (kind, desired) in [(TagKind::Genre, genres), (TagKind::Author, authors)] {
            if let Some(plan) = sync_book_tags(&mut store, book_id, kind, desired).await? {
                tracing::debug!(
                    book_id,
                    %kind,
                    added = plan.to_add.len(),
                    removed = plan.to_remove.len(),
                    "Synchronized book tags",
                );
            }
        }
        Ok(())
    }
}
